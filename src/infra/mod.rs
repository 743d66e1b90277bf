//! Infrastructure layer: config, logging, storage paths and process hooks.

pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod panic_hook;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
