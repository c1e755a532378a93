//! minibrowser — tab, navigation, and session state core for a minimal mobile browser shell.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod deeplink;
pub mod managers;
pub mod platform;
pub mod reconciler;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod surface;
pub mod types;
pub mod urls;
