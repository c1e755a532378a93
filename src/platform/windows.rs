// minibrowser platform paths for Windows
// Config: %APPDATA%/MiniBrowser
// Data:   %APPDATA%/MiniBrowser
// Cache:  %LOCALAPPDATA%/MiniBrowser/cache

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for minibrowser on Windows.
/// `%APPDATA%/MiniBrowser`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("MiniBrowser")
}

/// Returns the data directory for minibrowser on Windows.
/// `%APPDATA%/MiniBrowser`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("MiniBrowser")
}

/// Returns the cache directory for minibrowser on Windows.
/// `%LOCALAPPDATA%/MiniBrowser/cache`
pub fn get_cache_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata)
        .join("MiniBrowser")
        .join("cache")
}
