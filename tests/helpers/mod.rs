//! Test helpers module
//!
//! Mock Telegram server, fixtures and a test context wiring the services
//! to an in-memory ledger.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod test_context;
pub mod test_data;

pub use telegram_mock::*;
pub use test_context::*;
pub use test_data::*;
