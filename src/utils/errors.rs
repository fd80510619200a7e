//! Error handling for MaganteOTC
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for MaganteOTC application
#[derive(Error, Debug)]
pub enum MaganteError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthRejection),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings loading error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] argon2::Error),

    #[error("Token encoding error: {0}")]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a bearer credential can be refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("credential expired")]
    Expired,

    #[error("credential malformed")]
    Malformed,

    #[error("credential invalid")]
    Invalid,

    #[error("credential missing")]
    Missing,

    #[error("invalid login or password")]
    BadCredentials,
}

/// Per-recipient delivery failures on the messaging platform
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("send timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("recipient rejected: {0}")]
    Rejected(String),
}

/// Result type alias for MaganteOTC operations
pub type Result<T> = std::result::Result<T, MaganteError>;

/// Result type alias for a single channel send
pub type NotificationResult<T> = std::result::Result<T, NotificationError>;

impl MaganteError {
    /// Check if the error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        match self {
            MaganteError::Validation(_) => true,
            MaganteError::Auth(_) => true,
            MaganteError::Store(_) => false,
            MaganteError::Migration(_) => false,
            MaganteError::Notification(_) => true,
            MaganteError::Config(_) => false,
            MaganteError::Settings(_) => false,
            MaganteError::PasswordHash(_) => false,
            MaganteError::TokenEncoding(_) => false,
            MaganteError::Serialization(_) => false,
            MaganteError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MaganteError::Store(_) => ErrorSeverity::Critical,
            MaganteError::Migration(_) => ErrorSeverity::Critical,
            MaganteError::Config(_) => ErrorSeverity::Critical,
            MaganteError::Settings(_) => ErrorSeverity::Critical,
            MaganteError::Auth(_) => ErrorSeverity::Warning,
            MaganteError::Notification(_) => ErrorSeverity::Warning,
            MaganteError::Validation(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Whether the error is safe to show to the HTTP caller verbatim
    pub fn is_client_error(&self) -> bool {
        matches!(self, MaganteError::Validation(_) | MaganteError::Auth(_))
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(MaganteError::Validation("amount".to_string()).is_client_error());
        assert!(MaganteError::Auth(AuthRejection::Expired).is_client_error());
        assert!(!MaganteError::Store(sqlx::Error::RowNotFound).is_client_error());
        assert!(!MaganteError::Config("x".to_string()).is_client_error());
    }

    #[test]
    fn test_severity() {
        assert_eq!(MaganteError::Store(sqlx::Error::PoolTimedOut).severity(), ErrorSeverity::Critical);
        assert_eq!(MaganteError::Validation("x".to_string()).severity(), ErrorSeverity::Info);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
