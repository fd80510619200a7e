//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A ledger participant, keyed by Telegram user id.
///
/// The web password hash is loaded with the row but never serialized, so
/// handing a `User` to the HTTP layer cannot leak credentials.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub ton_wallet: Option<String>,
    pub card_details: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub successful_deals: i32,
    pub lang: String,
    pub is_admin: bool,
    pub web_login: Option<String>,
    #[serde(skip)]
    pub web_password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown to other participants in notifications
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => format!("ID {}", self.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub id: i64,
    pub username: Option<String>,
    pub ton_wallet: Option<String>,
    pub card_details: Option<String>,
    pub balance: Option<Decimal>,
    pub lang: Option<String>,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>) -> User {
        User {
            id: 42,
            username: username.map(str::to_string),
            ton_wallet: None,
            card_details: None,
            balance: Decimal::ZERO,
            successful_deals: 0,
            lang: "ru".to_string(),
            is_admin: false,
            web_login: Some("trader".to_string()),
            web_password_hash: Some("$argon2id$secret".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("trader")).display_name(), "@trader");
        assert_eq!(user(None).display_name(), "ID 42");
        assert_eq!(user(Some("")).display_name(), "ID 42");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(user(Some("trader"))).unwrap();
        assert!(json.get("web_password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
