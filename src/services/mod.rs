//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod channel;
pub mod deal;
pub mod relay;
pub mod templates;
pub mod ticket;

// Re-export commonly used services
pub use auth::{AuthService, CredentialVerifier, Principal};
pub use channel::{NotificationChannel, TelegramChannel};
pub use deal::{AmountInput, DealRecord, DealService};
pub use relay::NotificationRelay;
pub use templates::{payment_method_label, MessageTemplates, PaymentMethodLabel, RecipientRole};
pub use ticket::{TicketRecord, TicketService};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::LedgerStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub deal_service: DealService,
    pub ticket_service: TicketService,
    pub relay: Arc<NotificationRelay>,
}

impl ServiceFactory {
    /// Wire every service around one store and one channel.
    ///
    /// Must be called inside a tokio runtime, since the relay spawns its
    /// background worker here.
    pub fn new(
        settings: &Settings,
        store: Arc<dyn LedgerStore>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        let verifier = Arc::new(CredentialVerifier::new(&settings.auth));
        let relay = Arc::new(NotificationRelay::start(store.clone(), channel, &settings.notifications));

        Self {
            auth_service: AuthService::new(store.clone(), verifier),
            deal_service: DealService::new(store.clone(), relay.clone(), settings.bot.entry_url.clone()),
            ticket_service: TicketService::new(store, relay.clone()),
            relay,
        }
    }

    /// Drain background notifications before the process exits
    pub async fn shutdown(&self) {
        self.relay.shutdown().await;
    }
}
