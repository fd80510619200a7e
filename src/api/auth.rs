//! Bearer-token extraction for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use tracing::debug;
use crate::api::{error::ApiError, server::AppState};
use crate::services::Principal;
use crate::utils::errors::AuthRejection;

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_token(auth_header: Option<&str>) -> Option<&str> {
    auth_header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = extract_token(auth_header).ok_or(AuthRejection::Missing)?;
        let principal = state.services.auth_service.verifier().verify(token, Utc::now())?;

        debug!(user_id = principal.user_id, "Authenticated request");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_token(Some("Bearer   ")), None);
        assert_eq!(extract_token(Some("Basic abc")), None);
        assert_eq!(extract_token(None), None);
    }
}
