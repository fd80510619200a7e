//! Database service layer
//!
//! This module provides a high-level interface to database operations

use async_trait::async_trait;
use tracing::debug;
use crate::database::{DatabasePool, UserRepository, DealRepository, TicketRepository, LedgerStore};
use crate::models::*;
use crate::utils::errors::Result;

/// Postgres-backed ledger, shared with the Telegram bot
#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub deals: DealRepository,
    pub tickets: TicketRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            deals: DealRepository::new(pool.clone()),
            tickets: TicketRepository::new(pool),
        }
    }
}

#[async_trait]
impl LedgerStore for DatabaseService {
    async fn insert_user(&self, request: CreateUserRequest) -> Result<User> {
        debug!(user_id = request.id, "Inserting user");
        self.users.create(request).await
    }

    async fn insert_deal(&self, deal: &Deal) -> Result<Deal> {
        debug!(deal_id = %deal.id, seller_id = deal.seller_id, "Inserting deal");
        self.deals.create(deal).await
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<Ticket> {
        debug!(ticket_id = %ticket.id, user_id = ticket.user_id, "Inserting ticket");
        self.tickets.create(ticket).await
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_web_login(&self, login: &str) -> Result<Option<User>> {
        self.users.find_by_web_login(login).await
    }

    async fn find_deals_by_participant(&self, user_id: i64) -> Result<Vec<Deal>> {
        self.deals.find_by_participant(user_id).await
    }

    async fn find_tickets_by_user(&self, user_id: i64) -> Result<Vec<Ticket>> {
        self.tickets.find_by_user(user_id).await
    }

    async fn find_administrators(&self) -> Result<Vec<User>> {
        self.users.find_admins().await
    }

    async fn set_web_credentials(&self, user_id: i64, login: &str, password_hash: &str) -> Result<User> {
        self.users.set_web_credentials(user_id, login, password_hash).await
    }
}
