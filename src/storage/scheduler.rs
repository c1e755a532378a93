//! Fire-and-forget persistence writes.
//!
//! The shell never blocks a UI callback on storage: it hands records to this
//! scheduler, which owns the gateway on a writer thread. Failed writes are
//! logged and dropped. The next successful write reconciles state, so there
//! is no retry queue.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use serde_json::Value;

use super::gateway::StorageGateway;

enum WriteOp {
    Save { key: String, value: Value },
    Flush(mpsc::Sender<()>),
}

/// Owns the storage gateway behind an unbounded write queue.
pub struct PersistScheduler {
    tx: Option<mpsc::Sender<WriteOp>>,
    worker: Option<JoinHandle<()>>,
}

impl PersistScheduler {
    /// Takes ownership of the store and starts the writer thread.
    pub fn spawn(store: Box<dyn StorageGateway>) -> Self {
        let (tx, rx) = mpsc::channel::<WriteOp>();
        let worker = thread::Builder::new()
            .name("persist-writer".to_string())
            .spawn(move || {
                for op in rx {
                    match op {
                        WriteOp::Save { key, value } => {
                            if let Err(e) = store.save(&key, &value) {
                                tracing::warn!(key = %key, error = %e, "dropped persistence write");
                            }
                        }
                        WriteOp::Flush(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            })
            .expect("failed to spawn persistence writer thread");

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queues a write. Never blocks, never reports failure to the caller.
    pub fn schedule(&self, key: &str, value: Value) {
        if let Some(tx) = &self.tx {
            let op = WriteOp::Save {
                key: key.to_string(),
                value,
            };
            if tx.send(op).is_err() {
                tracing::warn!(key = %key, "persistence writer is gone, write dropped");
            }
        }
    }

    /// Blocks until every write queued so far has been attempted.
    pub fn flush(&self) {
        if let Some(tx) = &self.tx {
            let (ack_tx, ack_rx) = mpsc::channel();
            if tx.send(WriteOp::Flush(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }
}

impl Drop for PersistScheduler {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain its queue and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
