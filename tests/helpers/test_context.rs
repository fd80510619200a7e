//! Test context for unified test setup
//!
//! Wires the real services to an in-memory ledger and a mock Telegram API.

use std::sync::Arc;
use chrono::Utc;
use teloxide::Bot;
use MaganteOTC::{
    config::Settings,
    database::{LedgerStore, MemoryLedgerStore},
    models::User,
    services::{Principal, ServiceFactory, TelegramChannel},
};

use super::{telegram_mock::{MockResponseConfig, TelegramMockServer}, test_data::*};

pub struct TestContext {
    pub store: Arc<MemoryLedgerStore>,
    pub telegram_mock: TelegramMockServer,
    pub settings: Settings,
    pub services: ServiceFactory,
}

impl TestContext {
    /// Context whose Telegram mock accepts every message
    pub async fn new() -> Self {
        let telegram_mock = TelegramMockServer::new().await;
        telegram_mock.mock_send_message(MockResponseConfig::default()).await;
        Self::with_mock(telegram_mock).await
    }

    pub async fn with_mock(telegram_mock: TelegramMockServer) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let settings = Self::create_test_settings();
        let store = Arc::new(MemoryLedgerStore::new());

        let api_url = telegram_mock.api_url().parse().expect("mock server url");
        let bot = Bot::new(TEST_BOT_TOKEN).set_api_url(api_url);
        let channel = Arc::new(TelegramChannel::new(bot));

        let services = ServiceFactory::new(&settings, store.clone(), channel);

        Self { store, telegram_mock, settings, services }
    }

    fn create_test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = TEST_BOT_TOKEN.to_string();
        settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
        settings.notifications.send_timeout_secs = 2;
        settings.notifications.shutdown_grace_secs = 5;
        settings.logging.level = "debug".to_string();
        settings
    }

    pub async fn add_user(&self, request: MaganteOTC::models::CreateUserRequest) -> User {
        self.store.insert_user(request).await.expect("insert user")
    }

    /// Give a user web credentials and return a bearer token for them
    pub async fn login_as(&self, user_id: i64) -> String {
        let login = format!("web_{}", user_id);
        self.services
            .auth_service
            .set_web_credentials(user_id, &login, TEST_PASSWORD)
            .await
            .expect("set credentials");

        let (token, _) = self
            .services
            .auth_service
            .login(&login, TEST_PASSWORD, Utc::now())
            .await
            .expect("login");
        token
    }

    pub fn principal(user_id: i64) -> Principal {
        Principal { user_id }
    }

    /// Wait for background notifications to be delivered
    pub async fn drain(&self) {
        self.services.shutdown().await;
    }
}
