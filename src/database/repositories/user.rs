//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::MaganteError;

const USER_COLUMNS: &str = "id, username, ton_wallet, card_details, balance, successful_deals, lang, is_admin, web_login, web_password_hash, created_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, MaganteError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, ton_wallet, card_details, balance, successful_deals, lang, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.username)
        .bind(request.ton_wallet)
        .bind(request.card_details)
        .bind(request.balance.unwrap_or(Decimal::ZERO))
        .bind(request.lang.unwrap_or_else(|| "ru".to_string()))
        .bind(request.is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, MaganteError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by web login
    pub async fn find_by_web_login(&self, login: &str) -> Result<Option<User>, MaganteError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE web_login = $1"))
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get all administrators
    pub async fn find_admins(&self) -> Result<Vec<User>, MaganteError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_admin = true ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Set web login and password hash
    pub async fn set_web_credentials(&self, id: i64, login: &str, password_hash: &str) -> Result<User, MaganteError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET web_login = $2, web_password_hash = $3
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
