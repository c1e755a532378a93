// minibrowser persistence layer
// A key-value gateway for named JSON blobs, a SQLite-backed store, and the
// fire-and-forget write scheduler.

pub mod gateway;
pub mod migrations;
pub mod scheduler;
pub mod sqlite_store;

pub use gateway::{MemoryStore, StorageGateway};
pub use scheduler::PersistScheduler;
pub use sqlite_store::SqliteStore;
