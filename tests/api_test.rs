//! HTTP surface tests driven through the router with `oneshot`

mod helpers;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use helpers::*;
use serde_json::{json, Value};
use tower::ServiceExt;
use MaganteOTC::api::{create_router, AppState};

fn router(ctx: &TestContext) -> Router {
    create_router(AppState { services: ctx.services.clone() }, &ctx.settings.server)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let ctx = TestContext::new().await;
    let app = router(&ctx);

    let (status, body) = send(&app, get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Magante OTC API is running", "status": "active" }));

    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    let app = router(&ctx);

    let deal = json!({ "amount": 100, "description": "x", "paymentMethod": "ton" });

    let (status, body) = send(&app, post("/api/deals", None, deal.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&app, post("/api/deals", Some("garbage"), deal.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/tickets", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.drain().await;
    assert_eq!(ctx.store.deal_count().await, 0);
    assert!(ctx.telegram_mock.recipients().await.is_empty());
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    let app = router(&ctx);

    let stale = ctx
        .services
        .auth_service
        .verifier()
        .issue(42, Utc::now() - Duration::days(3))
        .unwrap();

    let (status, body) = send(&app, get("/api/me", Some(&stale))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn test_login_and_profile_hide_credentials() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    ctx.login_as(42).await;
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        post("/api/auth/login", None, json!({ "login": "web_42", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["userId"], 42);

    let (status, profile) = send(&app, get("/api/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["userId"], 42);
    assert_eq!(profile["username"], "seller_42");
    assert_eq!(profile["balance"], 150.0);

    let fields = profile.as_object().unwrap();
    for hidden in ["webLogin", "web_login", "webPasswordHash", "web_password_hash", "password"] {
        assert!(!fields.contains_key(hidden), "profile leaks {}", hidden);
    }

    let (status, body) = send(
        &app,
        post("/api/auth/login", None, json!({ "login": "web_42", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_create_and_list_deals_over_http() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    ctx.add_user(admin_request(100)).await;
    let token = ctx.login_as(42).await;
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        post(
            "/api/deals",
            Some(&token),
            json!({ "amount": 100, "description": "x", "paymentMethod": "ton" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["amount"], 100.0);
    assert_eq!(body["description"], "x");
    assert_eq!(body["status"], "active");
    assert_eq!(body["paymentMethod"], "ton");
    assert!(body["shareLink"].as_str().unwrap().ends_with(&format!("?start={}", id)));

    let (status, body) = send(&app, get("/api/deals", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let deals = body.as_array().unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["id"], id.as_str());
    assert_eq!(deals[0]["sellerId"], 42);
    assert_eq!(deals[0]["source"], "web");

    ctx.drain().await;
    assert_eq!(ctx.telegram_mock.recipients().await, vec![42, 100]);
}

#[tokio::test]
async fn test_invalid_deal_bodies_are_validation_errors() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    let token = ctx.login_as(42).await;
    let app = router(&ctx);

    for body in [
        json!({ "amount": "abc", "description": "x", "paymentMethod": "ton" }),
        json!({ "amount": 0, "description": "x", "paymentMethod": "ton" }),
        json!({ "amount": 10, "description": "", "paymentMethod": "ton" }),
        json!({ "description": "x", "paymentMethod": "ton" }),
    ] {
        let (status, response) = send(&app, post("/api/deals", Some(&token), body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"], "validation_error");
        assert!(response["message"].is_string());
    }

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/deals")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, response) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");

    ctx.drain().await;
    assert_eq!(ctx.store.deal_count().await, 0);
}

#[tokio::test]
async fn test_store_failure_is_opaque() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    let token = ctx.login_as(42).await;
    ctx.store.set_fail_writes(true);
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        post("/api/deals", Some(&token), json!({ "amount": 1, "description": "x", "paymentMethod": "ton" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal_error", "message": "Internal server error" }));
}

#[tokio::test]
async fn test_create_and_list_tickets_over_http() {
    let ctx = TestContext::new().await;
    ctx.add_user(seller_request(42)).await;
    ctx.add_user(admin_request(100)).await;
    ctx.add_user(admin_request(101)).await;
    let token = ctx.login_as(42).await;
    let app = router(&ctx);

    let (status, body) = send(
        &app,
        post("/api/tickets", Some(&token), json!({ "subject": "Help", "message": "Deal stuck" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["adminsNotified"], 2);
    assert_eq!(body["status"], "open");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/api/tickets", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], id.as_str());

    let (status, body) = send(
        &app,
        post("/api/tickets", Some(&token), json!({ "subject": "", "message": "no subject" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}
