//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod deal;
pub mod ticket;
pub mod notification;

// Re-export commonly used models
pub use user::{User, CreateUserRequest};
pub use deal::{Deal, DealStatus, DealSource, ParseEnumError};
pub use ticket::{Ticket, TicketStatus};
pub use notification::{NotificationEvent, NotificationKind, NotificationPayload, DeliverySummary};
