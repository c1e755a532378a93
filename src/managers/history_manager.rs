//! History Ledger for minibrowser.
//!
//! A most-recently-visited-first, URL-unique list capped at
//! [`HISTORY_CAP`](crate::types::history::HISTORY_CAP) entries. Re-visiting a
//! URL removes the stale entry and reinserts at the head, so position always
//! reflects the latest visit.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::types::errors::HistoryError;
use crate::types::history::{ClearRange, HistoryItem, HISTORY_CAP};
use crate::urls;

/// Trait defining history ledger operations.
pub trait HistoryManagerTrait {
    fn append(&mut self, url: &str) -> Option<&HistoryItem>;
    fn delete_one(&mut self, id: &str) -> Result<(), HistoryError>;
    fn clear(&mut self, range: ClearRange) -> usize;
    fn search(&self, query: &str) -> Vec<&HistoryItem>;
    fn items(&self) -> &[HistoryItem];
    fn restore(&mut self, items: Vec<HistoryItem>);
}

/// In-memory ledger; the shell persists it through the storage gateway.
pub struct HistoryManager {
    items: Vec<HistoryItem>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManagerTrait for HistoryManager {
    /// Record a finished visit. Blank and `about:blank` URLs are ignored.
    /// Returns the new head entry, or `None` when nothing was recorded.
    fn append(&mut self, url: &str) -> Option<&HistoryItem> {
        if url.is_empty() || url == urls::ABOUT_BLANK {
            return None;
        }

        let normalized = urls::normalize_for_dedup(url).to_string();
        self.items
            .retain(|item| urls::normalize_for_dedup(&item.url) != normalized);

        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title: urls::display_host(url),
            timestamp: Self::now_millis(),
        };
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAP);
        self.items.first()
    }

    /// Delete a single entry by ID.
    fn delete_one(&mut self, id: &str) -> Result<(), HistoryError> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Purge a time window. `LastMillis(ms)` removes entries newer than
    /// `now - ms`: "Last Hour" deletes the last hour of browsing and keeps
    /// everything older. Returns how many entries were removed.
    fn clear(&mut self, range: ClearRange) -> usize {
        let before = self.items.len();
        match range {
            ClearRange::All => self.items.clear(),
            ClearRange::LastMillis(ms) => {
                let cutoff = Self::now_millis() - ms;
                self.items.retain(|item| item.timestamp < cutoff);
            }
        }
        let removed = before - self.items.len();
        tracing::info!(removed, "cleared history range");
        removed
    }

    /// Case-insensitive contains-match over title and URL.
    fn search(&self, query: &str) -> Vec<&HistoryItem> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item.url.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Seeds the ledger from persisted state, re-applying the cap in case the
    /// stored record predates it.
    fn restore(&mut self, items: Vec<HistoryItem>) {
        self.items = items;
        self.items.truncate(HISTORY_CAP);
    }
}
