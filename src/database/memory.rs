//! In-process ledger store
//!
//! Mirrors the constraints of the Postgres schema (primary keys, foreign
//! keys, admin flag) closely enough for service and API tests to run
//! without a database. Writes can be switched to fail to exercise the
//! store-error paths. Only built for tests and the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use crate::database::LedgerStore;
use crate::models::{CreateUserRequest, Deal, Ticket, User};
use crate::utils::errors::{MaganteError, Result};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    deals: HashMap<String, Deal>,
    tickets: HashMap<String, Ticket>,
}

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

fn constraint_violation(message: String) -> MaganteError {
    MaganteError::Store(sqlx::Error::Protocol(message))
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert or update fail with a store error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn deal_count(&self) -> usize {
        self.tables.read().await.deals.len()
    }

    pub async fn ticket_count(&self) -> usize {
        self.tables.read().await.tickets.len()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(constraint_violation("write rejected: store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_user(&self, request: CreateUserRequest) -> Result<User> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&request.id) {
            return Err(constraint_violation(format!("duplicate user id {}", request.id)));
        }

        let user = User {
            id: request.id,
            username: request.username,
            ton_wallet: request.ton_wallet,
            card_details: request.card_details,
            balance: request.balance.unwrap_or(Decimal::ZERO),
            successful_deals: 0,
            lang: request.lang.unwrap_or_else(|| "ru".to_string()),
            is_admin: request.is_admin,
            web_login: None,
            web_password_hash: None,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn insert_deal(&self, deal: &Deal) -> Result<Deal> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&deal.seller_id) {
            return Err(constraint_violation(format!("seller {} does not exist", deal.seller_id)));
        }
        if tables.deals.contains_key(&deal.id) {
            return Err(constraint_violation(format!("duplicate deal id {}", deal.id)));
        }

        tables.deals.insert(deal.id.clone(), deal.clone());
        Ok(deal.clone())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<Ticket> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&ticket.user_id) {
            return Err(constraint_violation(format!("user {} does not exist", ticket.user_id)));
        }
        if tables.tickets.contains_key(&ticket.id) {
            return Err(constraint_violation(format!("duplicate ticket id {}", ticket.id)));
        }

        tables.tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket.clone())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_web_login(&self, login: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.web_login.as_deref() == Some(login))
            .cloned())
    }

    async fn find_deals_by_participant(&self, user_id: i64) -> Result<Vec<Deal>> {
        let tables = self.tables.read().await;
        let mut deals: Vec<Deal> = tables
            .deals
            .values()
            .filter(|deal| deal.involves(user_id))
            .cloned()
            .collect();
        deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(deals)
    }

    async fn find_tickets_by_user(&self, user_id: i64) -> Result<Vec<Ticket>> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .values()
            .filter(|ticket| ticket.user_id == user_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn find_administrators(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut admins: Vec<User> = tables.users.values().filter(|user| user.is_admin).cloned().collect();
        admins.sort_by_key(|user| user.id);
        Ok(admins)
    }

    async fn set_web_credentials(&self, user_id: i64, login: &str, password_hash: &str) -> Result<User> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|user| user.id != user_id && user.web_login.as_deref() == Some(login)) {
            return Err(constraint_violation(format!("web login {} already taken", login)));
        }

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(MaganteError::Store(sqlx::Error::RowNotFound))?;
        user.web_login = Some(login.to_string());
        user.web_password_hash = Some(password_hash.to_string());
        Ok(user.clone())
    }
}
