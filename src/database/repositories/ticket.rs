//! Ticket repository implementation

use sqlx::PgPool;
use crate::models::ticket::Ticket;
use crate::utils::errors::MaganteError;

#[derive(Clone, Debug)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ticket
    pub async fn create(&self, ticket: &Ticket) -> Result<Ticket, MaganteError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (id, user_id, subject, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, subject, message, status, created_at
            "#
        )
        .bind(&ticket.id)
        .bind(ticket.user_id)
        .bind(&ticket.subject)
        .bind(&ticket.message)
        .bind(ticket.status.as_str())
        .bind(ticket.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Get tickets opened by a user
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Ticket>, MaganteError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, subject, message, status, created_at FROM tickets WHERE user_id = $1 ORDER BY created_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }
}
