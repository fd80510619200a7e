//! Magante OTC web backend
//!
//! Main application entry point

use std::sync::Arc;
use anyhow::Context;
use tracing::info;

use MaganteOTC::{
    api,
    config::Settings,
    database::{connection::{create_pool, run_migrations, DatabaseConfig}, DatabaseService, LedgerStore},
    services::{NotificationChannel, ServiceFactory, TelegramChannel},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", MaganteOTC::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let store: Arc<dyn LedgerStore> = Arc::new(DatabaseService::new(db_pool.clone()));
    let channel: Arc<dyn NotificationChannel> = Arc::new(TelegramChannel::from_settings(&settings.bot));

    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, store, channel);

    let served = api::run(&settings, services.clone()).await;

    info!("Draining pending notifications...");
    services.shutdown().await;
    db_pool.close().await;

    served?;
    info!("Magante OTC web backend has been shut down.");
    Ok(())
}
