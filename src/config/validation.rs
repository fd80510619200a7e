//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MaganteError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_notification_config(&settings.notifications)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(MaganteError::Config(
            "Bot token is required".to_string()
        ));
    }

    let entry_url = url::Url::parse(&config.entry_url)
        .map_err(|e| MaganteError::Config(format!("Invalid bot entry URL: {}", e)))?;

    if !matches!(entry_url.scheme(), "http" | "https") {
        return Err(MaganteError::Config(
            "Bot entry URL must use http or https".to_string()
        ));
    }

    if entry_url.query().is_some() {
        return Err(MaganteError::Config(
            "Bot entry URL must not carry a query string".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(MaganteError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(MaganteError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(MaganteError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate auth configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 16 {
        return Err(MaganteError::Config(
            "JWT secret must be at least 16 characters".to_string()
        ));
    }

    if config.token_ttl_hours == 0 {
        return Err(MaganteError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate notification relay configuration
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if config.send_timeout_secs == 0 {
        return Err(MaganteError::Config(
            "Notification send timeout must be greater than 0".to_string()
        ));
    }

    if config.queue_capacity == 0 {
        return Err(MaganteError::Config(
            "Notification queue capacity must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MaganteError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MaganteError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
