//! Deal service implementation
//!
//! Validates and records web-originated deals, derives the bot share link and
//! hands the `deal_created` notification to the relay without waiting for it.

use std::str::FromStr;
use std::sync::Arc;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};
use crate::database::LedgerStore;
use crate::models::{Deal, DealSource, DealStatus, NotificationEvent};
use crate::services::auth::Principal;
use crate::services::relay::NotificationRelay;
use crate::utils::errors::{AuthRejection, MaganteError, Result};
use crate::utils::logging;

/// Largest amount the ledger's NUMERIC(20, 8) column can hold
const MAX_AMOUNT_DIGITS: u32 = 12;
const MAX_AMOUNT_SCALE: u32 = 8;

/// Amount as sent by the client: a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Number(value.into())
    }
}

/// Parse and range-check a deal amount
pub fn parse_amount(input: &AmountInput) -> Result<Decimal> {
    let raw = match input {
        AmountInput::Number(number) => number.to_string(),
        AmountInput::Text(text) => text.trim().to_string(),
    };

    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| MaganteError::Validation(format!("Amount is not a number: {}", raw)))?
        .normalize();

    if amount <= Decimal::ZERO {
        return Err(MaganteError::Validation("Amount must be greater than 0".to_string()));
    }
    if amount.scale() > MAX_AMOUNT_SCALE {
        return Err(MaganteError::Validation(format!(
            "Amount supports at most {} decimal places",
            MAX_AMOUNT_SCALE
        )));
    }
    if amount >= Decimal::from(10i64.pow(MAX_AMOUNT_DIGITS)) {
        return Err(MaganteError::Validation("Amount is too large".to_string()));
    }

    Ok(amount)
}

/// A stored deal together with its derived share link
#[derive(Debug, Clone)]
pub struct DealRecord {
    pub deal: Deal,
    pub share_link: String,
}

#[derive(Clone)]
pub struct DealService {
    store: Arc<dyn LedgerStore>,
    relay: Arc<NotificationRelay>,
    entry_url: String,
}

impl DealService {
    pub fn new(store: Arc<dyn LedgerStore>, relay: Arc<NotificationRelay>, entry_url: String) -> Self {
        Self { store, relay, entry_url }
    }

    /// `<entry_url>?start=<dealId>`
    pub fn share_link(&self, deal_id: &str) -> String {
        format!("{}?start={}", self.entry_url, deal_id)
    }

    /// Record a new web deal for the principal and notify in the background
    pub async fn create_deal(
        &self,
        principal: &Principal,
        amount: &AmountInput,
        description: &str,
        payment_method: &str,
    ) -> Result<DealRecord> {
        let amount = parse_amount(amount)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(MaganteError::Validation("Description must not be empty".to_string()));
        }
        let payment_method = payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(MaganteError::Validation("Payment method must not be empty".to_string()));
        }

        let seller = self
            .store
            .find_user_by_id(principal.user_id)
            .await?
            .ok_or(MaganteError::Auth(AuthRejection::Invalid))?;

        let created_at = Utc::now();
        let deal = Deal {
            id: Deal::web_id(created_at, seller.id),
            amount,
            description: description.to_string(),
            seller_id: seller.id,
            buyer_id: None,
            status: DealStatus::Active,
            payment_method,
            source: DealSource::Web,
            created_at,
        };

        debug!(deal_id = %deal.id, seller_id = seller.id, "Persisting web deal");
        let deal = self.store.insert_deal(&deal).await?;
        let share_link = self.share_link(&deal.id);
        logging::log_user_action(seller.id, "deal_created", Some(&deal.id));

        let event = NotificationEvent::deal_created(deal.clone(), share_link.clone(), seller.display_name());
        if !self.relay.submit(event) {
            info!(deal_id = %deal.id, "Deal stored but notification was not queued");
        }

        Ok(DealRecord { deal, share_link })
    }

    /// Deals the principal sells or buys, newest first
    pub async fn list_deals(&self, principal: &Principal) -> Result<Vec<Deal>> {
        self.store.find_deals_by_participant(principal.user_id).await
    }
}
