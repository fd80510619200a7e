//! Message templates for relay notifications
//!
//! Each event kind has one template per recipient role, with a Russian and an
//! English body. Parameters are substituted as `{name}` placeholders after
//! HTML-escaping, so user supplied text cannot inject markup.

use std::collections::HashMap;
use teloxide::utils::html;
use crate::models::{NotificationEvent, NotificationKind, NotificationPayload};

pub const DEFAULT_LANGUAGE: &str = "ru";

/// Which side of the event the recipient is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientRole {
    Owner,
    Admin,
}

/// Display label and glyph for a payment method code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodLabel {
    pub label: String,
    pub glyph: &'static str,
}

/// Map a payment method code to its display label.
///
/// Codes match case-insensitively. Unknown codes are shown upper-cased with a
/// generic card glyph.
pub fn payment_method_label(code: &str) -> PaymentMethodLabel {
    let (label, glyph) = match code.to_lowercase().as_str() {
        "ton" => ("TON".to_string(), "💎"),
        "sbp" => ("СБП".to_string(), "🏦"),
        "stars" => ("Stars".to_string(), "⭐"),
        _ => (code.to_uppercase(), "💳"),
    };

    PaymentMethodLabel { label, glyph }
}

#[derive(Debug, Clone)]
struct MessageTemplate {
    content: HashMap<&'static str, &'static str>,
}

/// Deterministic renderer for every (kind, role) pair the relay sends
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    templates: HashMap<(NotificationKind, RecipientRole), MessageTemplate>,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageTemplates {
    pub fn new() -> Self {
        Self { templates: Self::load_default_templates() }
    }

    /// Render the message an event produces for one recipient
    pub fn render(&self, event: &NotificationEvent, role: RecipientRole, language: &str) -> Option<String> {
        let template = self.templates.get(&(event.kind, role))?;
        let body = template
            .content
            .get(language)
            .or_else(|| template.content.get(DEFAULT_LANGUAGE))?;

        Some(Self::substitute(body, &Self::parameters(event)))
    }

    /// Fill `{name}` placeholders in one pass so substituted user text is
    /// never scanned for placeholders itself
    fn substitute(body: &str, parameters: &HashMap<&'static str, String>) -> String {
        let mut formatted = String::with_capacity(body.len());
        let mut rest = body;

        while let Some(start) = rest.find('{') {
            formatted.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}').map(|end| (&after[..end], end)) {
                Some((key, end)) if parameters.contains_key(key) => {
                    formatted.push_str(&html::escape(&parameters[key]));
                    rest = &after[end + 1..];
                }
                _ => {
                    formatted.push('{');
                    rest = after;
                }
            }
        }

        formatted.push_str(rest);
        formatted
    }

    fn parameters(event: &NotificationEvent) -> HashMap<&'static str, String> {
        let mut parameters = HashMap::new();
        parameters.insert("actor_name", event.actor_name.clone());
        parameters.insert("actor_id", event.actor_id.to_string());

        match &event.payload {
            NotificationPayload::Deal { deal, share_link } => {
                let method = payment_method_label(&deal.payment_method);
                parameters.insert("deal_id", deal.id.clone());
                parameters.insert("amount", deal.amount.normalize().to_string());
                parameters.insert("method_label", method.label);
                parameters.insert("method_glyph", method.glyph.to_string());
                parameters.insert("description", deal.description.clone());
                parameters.insert("share_link", share_link.clone());
            }
            NotificationPayload::Ticket { ticket } => {
                parameters.insert("ticket_id", ticket.id.clone());
                parameters.insert("subject", ticket.subject.clone());
                parameters.insert("message", ticket.message.clone());
            }
        }

        parameters
    }

    fn load_default_templates() -> HashMap<(NotificationKind, RecipientRole), MessageTemplate> {
        let mut templates = HashMap::new();

        templates.insert((NotificationKind::DealCreated, RecipientRole::Owner), MessageTemplate {
            content: HashMap::from([
                ("ru", "✅ <b>Сделка создана на сайте!</b>\n\n🆔 <code>{deal_id}</code>\n💰 Сумма: {amount} {method_label} {method_glyph}\n📝 {description}\n\n🔗 Ссылка для покупателя:\n{share_link}"),
                ("en", "✅ <b>Deal created on the website!</b>\n\n🆔 <code>{deal_id}</code>\n💰 Amount: {amount} {method_label} {method_glyph}\n📝 {description}\n\n🔗 Link for the buyer:\n{share_link}"),
            ]),
        });

        templates.insert((NotificationKind::DealCreated, RecipientRole::Admin), MessageTemplate {
            content: HashMap::from([
                ("ru", "🆕 <b>Новая сделка с сайта</b>\n\n👤 Продавец: {actor_name} (ID {actor_id})\n🆔 <code>{deal_id}</code>\n💰 Сумма: {amount} {method_label} {method_glyph}\n📝 {description}"),
                ("en", "🆕 <b>New deal from the website</b>\n\n👤 Seller: {actor_name} (ID {actor_id})\n🆔 <code>{deal_id}</code>\n💰 Amount: {amount} {method_label} {method_glyph}\n📝 {description}"),
            ]),
        });

        templates.insert((NotificationKind::TicketCreated, RecipientRole::Admin), MessageTemplate {
            content: HashMap::from([
                ("ru", "🎫 <b>Новый тикет поддержки</b>\n\n👤 От: {actor_name} (ID {actor_id})\n🆔 <code>{ticket_id}</code>\n📌 Тема: {subject}\n\n💬 {message}"),
                ("en", "🎫 <b>New support ticket</b>\n\n👤 From: {actor_name} (ID {actor_id})\n🆔 <code>{ticket_id}</code>\n📌 Subject: {subject}\n\n💬 {message}"),
            ]),
        });

        templates
    }
}
