// minibrowser platform paths for Linux
// Config: ~/.config/minibrowser
// Data:   ~/.local/share/minibrowser
// Cache:  ~/.cache/minibrowser

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for minibrowser on Linux.
/// Uses `$XDG_CONFIG_HOME/minibrowser` if set, otherwise `~/.config/minibrowser`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("minibrowser")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("minibrowser")
    }
}

/// Returns the data directory for minibrowser on Linux.
/// Uses `$XDG_DATA_HOME/minibrowser` if set, otherwise `~/.local/share/minibrowser`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("minibrowser")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("minibrowser")
    }
}

/// Returns the cache directory for minibrowser on Linux.
/// Uses `$XDG_CACHE_HOME/minibrowser` if set, otherwise `~/.cache/minibrowser`.
pub fn get_cache_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("minibrowser")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".cache").join("minibrowser")
    }
}
