//! Deal model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use thiserror::Error;

/// Lifecycle of a deal. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Active,
    Completed,
    Cancelled,
    Expired,
}

/// Where a deal was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealSource {
    Bot,
    Web,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Active => "active",
            DealStatus::Completed => "completed",
            DealStatus::Cancelled => "cancelled",
            DealStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DealStatus::Active)
    }

    pub fn can_transition_to(&self, next: DealStatus) -> bool {
        matches!(self, DealStatus::Active) && next.is_terminal()
    }
}

impl DealSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealSource::Bot => "bot",
            DealSource::Web => "web",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DealStatus::Active),
            "completed" => Ok(DealStatus::Completed),
            "cancelled" => Ok(DealStatus::Cancelled),
            "expired" => Ok(DealStatus::Expired),
            other => Err(ParseEnumError { kind: "deal status", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for DealStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for DealSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bot" => Ok(DealSource::Bot),
            "web" => Ok(DealSource::Web),
            other => Err(ParseEnumError { kind: "deal source", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for DealSource {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub seller_id: i64,
    pub buyer_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub status: DealStatus,
    pub payment_method: String,
    #[sqlx(try_from = "String")]
    pub source: DealSource,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    /// Build the id of a web-originated deal: `web_<unix-millis>_<sellerId>`
    pub fn web_id(created_at: DateTime<Utc>, seller_id: i64) -> String {
        format!("web_{}_{}", created_at.timestamp_millis(), seller_id)
    }

    /// Split a web deal id back into its timestamp and seller parts
    pub fn parse_web_id(id: &str) -> Option<(i64, i64)> {
        let rest = id.strip_prefix("web_")?;
        let (timestamp, seller) = rest.split_once('_')?;
        Some((timestamp.parse().ok()?, seller.parse().ok()?))
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.seller_id == user_id || self.buyer_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_transitions() {
        assert!(DealStatus::Active.can_transition_to(DealStatus::Completed));
        assert!(DealStatus::Active.can_transition_to(DealStatus::Cancelled));
        assert!(DealStatus::Active.can_transition_to(DealStatus::Expired));
        assert!(!DealStatus::Active.can_transition_to(DealStatus::Active));

        for terminal in [DealStatus::Completed, DealStatus::Cancelled, DealStatus::Expired] {
            assert!(terminal.is_terminal());
            for next in [DealStatus::Active, DealStatus::Completed, DealStatus::Cancelled, DealStatus::Expired] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("active".parse::<DealStatus>(), Ok(DealStatus::Active));
        assert_eq!(DealStatus::try_from("expired".to_string()), Ok(DealStatus::Expired));
        assert!("confirmed".parse::<DealStatus>().is_err());
        assert_eq!("web".parse::<DealSource>(), Ok(DealSource::Web));
    }

    #[test]
    fn test_web_id_format() {
        let created_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = Deal::web_id(created_at, 42);
        assert_eq!(id, "web_1700000000123_42");
        assert_eq!(Deal::parse_web_id(&id), Some((1_700_000_000_123, 42)));
        assert_eq!(Deal::parse_web_id("deal_123"), None);
        assert_eq!(Deal::parse_web_id("web_abc_42"), None);
    }
}
