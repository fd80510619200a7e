//! Deal repository implementation

use sqlx::PgPool;
use crate::models::deal::Deal;
use crate::utils::errors::MaganteError;

const DEAL_COLUMNS: &str = "id, amount, description, seller_id, buyer_id, status, payment_method, source, created_at";

#[derive(Clone, Debug)]
pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new deal
    pub async fn create(&self, deal: &Deal) -> Result<Deal, MaganteError> {
        let deal = sqlx::query_as::<_, Deal>(&format!(
            r#"
            INSERT INTO deals (id, amount, description, seller_id, buyer_id, status, payment_method, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DEAL_COLUMNS}
            "#
        ))
        .bind(&deal.id)
        .bind(deal.amount)
        .bind(&deal.description)
        .bind(deal.seller_id)
        .bind(deal.buyer_id)
        .bind(deal.status.as_str())
        .bind(&deal.payment_method)
        .bind(deal.source.as_str())
        .bind(deal.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(deal)
    }

    /// Find deals where the user is seller or buyer
    pub async fn find_by_participant(&self, user_id: i64) -> Result<Vec<Deal>, MaganteError> {
        let deals = sqlx::query_as::<_, Deal>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals WHERE seller_id = $1 OR buyer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }
}
