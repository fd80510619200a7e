//! Ledger store abstraction
//!
//! Services talk to the ledger through [`LedgerStore`] so the same code runs
//! against Postgres in production and against the in-memory store in tests.

use async_trait::async_trait;
use crate::models::{Deal, Ticket, User, CreateUserRequest};
use crate::utils::errors::Result;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_user(&self, request: CreateUserRequest) -> Result<User>;

    async fn insert_deal(&self, deal: &Deal) -> Result<Deal>;

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<Ticket>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_web_login(&self, login: &str) -> Result<Option<User>>;

    /// Deals where the user is seller or buyer, newest first
    async fn find_deals_by_participant(&self, user_id: i64) -> Result<Vec<Deal>>;

    /// Tickets opened by the user, newest first
    async fn find_tickets_by_user(&self, user_id: i64) -> Result<Vec<Ticket>>;

    async fn find_administrators(&self) -> Result<Vec<User>>;

    /// Store a web login together with an already hashed password
    async fn set_web_credentials(&self, user_id: i64, login: &str, password_hash: &str) -> Result<User>;
}
