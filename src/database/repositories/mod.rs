//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod deal;
pub mod ticket;

// Re-export repositories
pub use user::UserRepository;
pub use deal::DealRepository;
pub use ticket::TicketRepository;
