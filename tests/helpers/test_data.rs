//! Test data fixtures

use rust_decimal::Decimal;
use MaganteOTC::models::CreateUserRequest;

pub const TEST_BOT_TOKEN: &str = "12345:test_token";
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn seller_request(id: i64) -> CreateUserRequest {
    CreateUserRequest {
        id,
        username: Some(format!("seller_{}", id)),
        ton_wallet: Some("UQBtest_wallet".to_string()),
        card_details: Some("4276 0000 0000 0000".to_string()),
        balance: Some(Decimal::new(150, 0)),
        lang: Some("en".to_string()),
        is_admin: false,
    }
}

pub fn admin_request(id: i64) -> CreateUserRequest {
    CreateUserRequest {
        id,
        username: Some(format!("admin_{}", id)),
        ton_wallet: None,
        card_details: None,
        balance: None,
        lang: Some("ru".to_string()),
        is_admin: true,
    }
}

pub fn anonymous_request(id: i64) -> CreateUserRequest {
    CreateUserRequest {
        id,
        username: None,
        ton_wallet: None,
        card_details: None,
        balance: None,
        lang: None,
        is_admin: false,
    }
}
