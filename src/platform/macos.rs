// minibrowser platform paths for macOS
// Config: ~/Library/Application Support/MiniBrowser
// Data:   ~/Library/Application Support/MiniBrowser
// Cache:  ~/Library/Caches/MiniBrowser

use std::env;
use std::path::PathBuf;

/// Returns the home directory on macOS.
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for minibrowser on macOS.
/// `~/Library/Application Support/MiniBrowser`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("MiniBrowser")
}

/// Returns the data directory for minibrowser on macOS.
/// `~/Library/Application Support/MiniBrowser`
pub fn get_data_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("MiniBrowser")
}

/// Returns the cache directory for minibrowser on macOS.
/// `~/Library/Caches/MiniBrowser`
pub fn get_cache_dir() -> PathBuf {
    home_dir().join("Library").join("Caches").join("MiniBrowser")
}
