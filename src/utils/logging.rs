//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Magante OTC web backend.

use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::models::DeliverySummary;
use crate::utils::errors::{MaganteError, NotificationError, Result};

/// Initialize logging based on configuration.
///
/// When a file path is configured, JSON lines are also written to a daily
/// rolling file. The returned guard must be held until exit so buffered
/// lines are flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| MaganteError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("magante-otc.log");

            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| MaganteError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log the outcome of one notification fan-out
pub fn log_delivery_summary(kind: &str, subject: &str, summary: &DeliverySummary) {
    if summary.failed() > 0 {
        warn!(
            kind = kind,
            subject = subject,
            total = summary.total,
            delivered = summary.delivered(),
            failed = summary.failed(),
            owner_notified = summary.owner_notified,
            admins_notified = summary.admins_notified,
            "Notification partially delivered"
        );
    } else {
        info!(
            kind = kind,
            subject = subject,
            total = summary.total,
            owner_notified = summary.owner_notified,
            admins_notified = summary.admins_notified,
            "Notification delivered"
        );
    }
}

/// Log a single failed send
pub fn log_notification_failure(recipient_id: i64, kind: &str, subject: &str, error: &NotificationError) {
    match error {
        NotificationError::Timeout(_) => warn!(
            recipient_id = recipient_id,
            kind = kind,
            subject = subject,
            error = %error,
            "Notification send timed out"
        ),
        _ => warn!(
            recipient_id = recipient_id,
            kind = kind,
            subject = subject,
            error = %error,
            "Notification send failed"
        ),
    }
}
