//! Ticket model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::deal::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!((self, next), (TicketStatus::Open, TicketStatus::Closed))
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(ParseEnumError { kind: "ticket status", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: String,
    pub user_id: i64,
    pub subject: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// `ticket_` followed by eight lowercase hex digits
    pub fn generate_id() -> String {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        format!("ticket_{}", &simple[..8])
    }

    pub fn is_valid_id(id: &str) -> bool {
        id.strip_prefix("ticket_")
            .map(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)))
            .unwrap_or(false)
    }
}
