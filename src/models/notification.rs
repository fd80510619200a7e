//! Notification event model
//!
//! Events are never persisted. They live from the moment a deal or ticket
//! row is committed until the relay has finished delivering them.

use serde::Serialize;
use super::{Deal, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DealCreated,
    TicketCreated,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::DealCreated => "deal_created",
            NotificationKind::TicketCreated => "ticket_created",
        }
    }
}

/// Snapshot of the record that triggered the event
#[derive(Debug, Clone, Serialize)]
pub enum NotificationPayload {
    Deal { deal: Deal, share_link: String },
    Ticket { ticket: Ticket },
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
    /// Display name of the user who caused the event
    pub actor_name: String,
    /// Id of the user who caused the event; never in the admin fan-out
    pub actor_id: i64,
    /// User who receives the owner-facing message, if any
    pub owner_id: Option<i64>,
}

impl NotificationEvent {
    pub fn deal_created(deal: Deal, share_link: String, seller_name: String) -> Self {
        let seller_id = deal.seller_id;
        Self {
            kind: NotificationKind::DealCreated,
            payload: NotificationPayload::Deal { deal, share_link },
            actor_name: seller_name,
            actor_id: seller_id,
            owner_id: Some(seller_id),
        }
    }

    /// Ticket events go to administrators only
    pub fn ticket_created(ticket: Ticket, owner_name: String) -> Self {
        let user_id = ticket.user_id;
        Self {
            kind: NotificationKind::TicketCreated,
            payload: NotificationPayload::Ticket { ticket },
            actor_name: owner_name,
            actor_id: user_id,
            owner_id: None,
        }
    }

    /// Id of the deal or ticket, for log correlation
    pub fn subject_id(&self) -> &str {
        match &self.payload {
            NotificationPayload::Deal { deal, .. } => &deal.id,
            NotificationPayload::Ticket { ticket } => &ticket.id,
        }
    }
}

/// Outcome of one relay dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliverySummary {
    pub owner_notified: bool,
    pub admins_notified: usize,
    /// Number of recipients a send was attempted for
    pub total: usize,
}

impl DeliverySummary {
    pub fn delivered(&self) -> usize {
        self.admins_notified + usize::from(self.owner_notified)
    }

    pub fn failed(&self) -> usize {
        self.total - self.delivered()
    }
}
