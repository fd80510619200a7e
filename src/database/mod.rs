//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryLedgerStore;
pub use repositories::{UserRepository, DealRepository, TicketRepository};
pub use service::DatabaseService;
pub use store::LedgerStore;
