//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

const SEND_MESSAGE_PATH: &str = r"(?i)^/bot[^/]+/sendmessage$";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub success: bool,
    pub delay_ms: Option<u64>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self { success: true, delay_ms: None }
    }
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Base URL to hand to `Bot::set_api_url`
    pub fn api_url(&self) -> String {
        self.server.uri()
    }

    fn response(config: &MockResponseConfig) -> ResponseTemplate {
        let body = if config.success {
            json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "MaganteBot",
                        "username": "MaganteOTCBot"
                    },
                    "chat": {
                        "id": 42,
                        "first_name": "Test",
                        "type": "private"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            })
        } else {
            json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })
        };

        let mut response = ResponseTemplate::new(if config.success { 200 } else { 400 }).set_body_json(body);
        if let Some(delay) = config.delay_ms {
            response = response.set_delay(std::time::Duration::from_millis(delay));
        }
        response
    }

    /// Setup mock for the sendMessage endpoint
    pub async fn mock_send_message(&self, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path_regex(SEND_MESSAGE_PATH))
            .respond_with(Self::response(&config))
            .mount(&self.server)
            .await;
    }

    /// Make sendMessage fail for one chat, taking precedence over the default mock
    pub async fn mock_send_message_failure_for(&self, chat_id: i64) {
        Mock::given(method("POST"))
            .and(path_regex(SEND_MESSAGE_PATH))
            .and(body_partial_json(json!({ "chat_id": chat_id })))
            .respond_with(Self::response(&MockResponseConfig { success: false, delay_ms: None }))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Bodies of every sendMessage request received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
            .collect()
    }

    /// Chat ids of every sendMessage request received so far, sorted
    pub async fn recipients(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .sent_messages()
            .await
            .iter()
            .filter_map(|body| body["chat_id"].as_i64())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Reset all mocks
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
