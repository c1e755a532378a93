use serde::{Deserialize, Serialize};

/// Maximum number of entries the ledger keeps; older entries fall off the end.
pub const HISTORY_CAP: usize = 100;

/// One visited-page entry in the history ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryItem {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Creation instant, milliseconds since the UNIX epoch.
    pub timestamp: i64,
}

/// Time window for a bulk history purge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearRange {
    /// Remove entries newer than `now - millis` ("Last Hour" clears the last hour).
    LastMillis(i64),
    /// Remove everything.
    All,
}

impl ClearRange {
    /// Maps the wire encoding used by the UI ranges: `-1` means everything.
    pub fn from_millis(millis: i64) -> Self {
        if millis < 0 {
            ClearRange::All
        } else {
            ClearRange::LastMillis(millis)
        }
    }
}

/// The purge windows offered by the history overlay.
pub const CLEAR_RANGES: [(&str, i64); 5] = [
    ("Last Hour", 3_600 * 1000),
    ("Last 24 Hours", 24 * 3_600 * 1000),
    ("Last 7 Days", 7 * 24 * 3_600 * 1000),
    ("Last 4 Weeks", 28 * 24 * 3_600 * 1000),
    ("All Time", -1),
];
