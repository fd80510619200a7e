use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::api::{error::ApiError, server::AppState};
use crate::models::{Deal, Ticket, User};
use crate::services::{AmountInput, Principal};
use crate::utils::errors::MaganteError;

type ApiResult<T> = Result<T, ApiError>;

/// Unwrap a JSON body, reporting decode failures as validation errors
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| MaganteError::Validation(rejection.body_text()).into())
}

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Magante OTC API is running",
        "status": "active"
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Profile as shown to its owner. Carries no credential material.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: i64,
    pub username: Option<String>,
    pub ton_wallet: Option<String>,
    pub card_details: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub successful_deals: i32,
    pub lang: String,
    pub is_admin: bool,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            ton_wallet: user.ton_wallet,
            card_details: user.card_details,
            balance: user.balance,
            successful_deals: user.successful_deals,
            lang: user.lang,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: ProfileResponse,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let request = json_body(payload)?;
    let (token, user) = state
        .services
        .auth_service
        .login(&request.login, &request.password, Utc::now())
        .await?;

    Ok(Json(LoginResponse { token, user: user.into() }))
}

pub async fn me(State(state): State<AppState>, principal: Principal) -> ApiResult<Json<ProfileResponse>> {
    let user = state.services.auth_service.current_user(&principal).await?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub amount: AmountInput,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "payment_method")]
    pub payment_method: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub status: String,
    pub payment_method: String,
    pub share_link: String,
}

pub async fn create_deal(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<CreateDealRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DealResponse>)> {
    let request = json_body(payload)?;
    let record = state
        .services
        .deal_service
        .create_deal(&principal, &request.amount, &request.description, &request.payment_method)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DealResponse {
            id: record.deal.id,
            amount: record.deal.amount,
            description: record.deal.description,
            status: record.deal.status.to_string(),
            payment_method: record.deal.payment_method,
            share_link: record.share_link,
        }),
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSummary {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub seller_id: i64,
    pub buyer_id: Option<i64>,
    pub status: String,
    pub payment_method: String,
    pub source: String,
    pub share_link: String,
    pub created_at: DateTime<Utc>,
}

pub async fn list_deals(State(state): State<AppState>, principal: Principal) -> ApiResult<Json<Vec<DealSummary>>> {
    let deal_service = &state.services.deal_service;
    let deals = deal_service.list_deals(&principal).await?;

    let summaries = deals
        .into_iter()
        .map(|deal: Deal| DealSummary {
            share_link: deal_service.share_link(&deal.id),
            id: deal.id,
            amount: deal.amount,
            description: deal.description,
            seller_id: deal.seller_id,
            buyer_id: deal.buyer_id,
            status: deal.status.to_string(),
            payment_method: deal.payment_method,
            source: deal.source.as_str().to_string(),
            created_at: deal.created_at,
        })
        .collect();

    Ok(Json(summaries))
}

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub admins_notified: usize,
}

pub async fn create_ticket(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let request = json_body(payload)?;
    let record = state
        .services
        .ticket_service
        .create_ticket(&principal, &request.subject, &request.message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TicketResponse {
            id: record.ticket.id,
            subject: record.ticket.subject,
            message: record.ticket.message,
            status: record.ticket.status.to_string(),
            admins_notified: record.admins_notified,
        }),
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub id: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub async fn list_tickets(State(state): State<AppState>, principal: Principal) -> ApiResult<Json<Vec<TicketSummary>>> {
    let tickets = state.services.ticket_service.list_tickets(&principal).await?;

    Ok(Json(
        tickets
            .into_iter()
            .map(|ticket: Ticket| TicketSummary {
                id: ticket.id,
                subject: ticket.subject,
                message: ticket.message,
                status: ticket.status.to_string(),
                created_at: ticket.created_at,
            })
            .collect(),
    ))
}
