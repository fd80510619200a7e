//! Notification channel
//!
//! The external messaging platform as seen by the relay: one formatted
//! message to one recipient, success or failure, nothing more. Timeouts are
//! applied by the caller.

use async_trait::async_trait;
use teloxide::{Bot, types::{ChatId, ParseMode}, requests::Requester, prelude::Request, payloads::SendMessageSetters, sugar::request::RequestLinkPreviewExt};
use tracing::debug;
use crate::utils::errors::NotificationResult;

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, recipient_id: i64, text: &str) -> NotificationResult<()>;
}

/// Sends HTML-formatted messages through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Build a channel for the configured bot token
    pub fn from_settings(settings: &crate::config::BotConfig) -> Self {
        Self::new(Bot::new(&settings.token))
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    async fn send(&self, recipient_id: i64, text: &str) -> NotificationResult<()> {
        let message = self
            .bot
            .send_message(ChatId(recipient_id), text)
            .parse_mode(ParseMode::Html)
            .disable_link_preview(true)
            .send()
            .await?;

        debug!(recipient = recipient_id, message_id = message.id.0, "Telegram message delivered");
        Ok(())
    }
}
