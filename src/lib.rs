//! Magante OTC web backend
//!
//! HTTP API through which authenticated web users create OTC deals and
//! support tickets in the ledger shared with the Magante Telegram bot.
//! Every new record is announced over Telegram to its owner and to the
//! administrators.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MaganteError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, LedgerStore};
#[cfg(any(test, feature = "test-support"))]
pub use database::MemoryLedgerStore;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
