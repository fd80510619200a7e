//! HTTP API module
//!
//! JSON endpoints used by the web client. Handlers are thin: they extract the
//! principal, call a service and map the result.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{create_router, run, AppState};
