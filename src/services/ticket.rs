//! Ticket service implementation
//!
//! Support tickets are stored and then announced to every administrator.
//! Unlike deals, ticket creation waits for the relay and reports how many
//! administrators were reached.

use std::sync::Arc;
use chrono::Utc;
use tracing::debug;
use crate::database::LedgerStore;
use crate::models::{NotificationEvent, Ticket, TicketStatus};
use crate::services::auth::Principal;
use crate::services::relay::NotificationRelay;
use crate::utils::errors::{AuthRejection, MaganteError, Result};
use crate::utils::logging;

#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub ticket: Ticket,
    pub admins_notified: usize,
}

#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn LedgerStore>,
    relay: Arc<NotificationRelay>,
}

impl TicketService {
    pub fn new(store: Arc<dyn LedgerStore>, relay: Arc<NotificationRelay>) -> Self {
        Self { store, relay }
    }

    pub async fn create_ticket(&self, principal: &Principal, subject: &str, message: &str) -> Result<TicketRecord> {
        let subject = subject.trim();
        let message = message.trim();
        if subject.is_empty() || message.is_empty() {
            return Err(MaganteError::Validation("Subject and message are required".to_string()));
        }

        let owner = self
            .store
            .find_user_by_id(principal.user_id)
            .await?
            .ok_or(MaganteError::Auth(AuthRejection::Invalid))?;

        let ticket = Ticket {
            id: Ticket::generate_id(),
            user_id: owner.id,
            subject: subject.to_string(),
            message: message.to_string(),
            status: TicketStatus::Open,
            created_at: Utc::now(),
        };

        debug!(ticket_id = %ticket.id, user_id = owner.id, "Persisting ticket");
        let ticket = self.store.insert_ticket(&ticket).await?;
        logging::log_user_action(owner.id, "ticket_created", Some(&ticket.id));

        let event = NotificationEvent::ticket_created(ticket.clone(), owner.display_name());
        let summary = self.relay.dispatch(&event).await;

        Ok(TicketRecord { ticket, admins_notified: summary.admins_notified })
    }

    /// Tickets opened by the principal, newest first
    pub async fn list_tickets(&self, principal: &Principal) -> Result<Vec<Ticket>> {
        self.store.find_tickets_by_user(principal.user_id).await
    }
}
