//! Mapping of service errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};
use crate::utils::errors::{AuthRejection, MaganteError};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub MaganteError);

impl<E> From<E> for ApiError
where
    E: Into<MaganteError>,
{
    fn from(error: E) -> Self {
        ApiError(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            MaganteError::Validation(message) => (StatusCode::BAD_REQUEST, "validation_error", message.clone()),
            MaganteError::Auth(rejection) => {
                warn!(reason = %rejection, "Request not authenticated");
                let message = match rejection {
                    AuthRejection::BadCredentials => "Invalid login or password".to_string(),
                    AuthRejection::Expired => "Session expired, please log in again".to_string(),
                    AuthRejection::Missing => "Authorization required".to_string(),
                    AuthRejection::Malformed | AuthRejection::Invalid => "Invalid credential".to_string(),
                };
                (StatusCode::UNAUTHORIZED, "unauthorized", message)
            }
            other => {
                error!(error = %other, severity = %other.severity(), "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
