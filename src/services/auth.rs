//! Authentication service implementation
//!
//! Issues and verifies the bearer tokens used by the web client, and checks
//! web logins against the argon2 hashes stored in the shared ledger.

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::config::AuthConfig;
use crate::database::LedgerStore;
use crate::models::User;
use crate::utils::errors::{AuthRejection, MaganteError, Result};

/// The authenticated identity behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

/// JWT claims carried by web tokens
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and checks HS256 bearer tokens.
///
/// Expiry is checked against the instant passed by the caller rather than
/// the system clock.
#[derive(Clone)]
pub struct CredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl CredentialVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: Duration::hours(config.token_ttl_hours as i64),
        }
    }

    /// Issue a token for a user, valid from `now` for the configured TTL
    pub fn issue(&self, user_id: i64, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> std::result::Result<Principal, AuthRejection> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => AuthRejection::Malformed,
                ErrorKind::ExpiredSignature => AuthRejection::Expired,
                _ => AuthRejection::Invalid,
            }
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(AuthRejection::Expired);
        }

        let user_id = data.claims.sub.parse::<i64>().map_err(|_| AuthRejection::Malformed)?;
        Ok(Principal { user_id })
    }
}

/// Hash a web password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    Ok(argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())?)
}

/// Check a password against a stored hash. Corrupt hashes never match.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    argon2::verify_encoded(password_hash, password.as_bytes()).unwrap_or(false)
}

/// Web login flow on top of the ledger's user table
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn LedgerStore>,
    verifier: Arc<CredentialVerifier>,
}

impl AuthService {
    pub fn new(store: Arc<dyn LedgerStore>, verifier: Arc<CredentialVerifier>) -> Self {
        Self { store, verifier }
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    /// Exchange a web login and password for a bearer token
    pub async fn login(&self, login: &str, password: &str, now: DateTime<Utc>) -> Result<(String, User)> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(MaganteError::Validation("Login and password are required".to_string()));
        }

        let Some(user) = self.store.find_user_by_web_login(login).await? else {
            warn!(login = %login, "Login attempt for unknown web login");
            return Err(AuthRejection::BadCredentials.into());
        };

        let Some(password_hash) = user.web_password_hash.clone() else {
            warn!(user_id = user.id, "Login attempt for user without web password");
            return Err(AuthRejection::BadCredentials.into());
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password_hash, &password))
            .await
            .unwrap_or(false);

        if !matches {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthRejection::BadCredentials.into());
        }

        let token = self.verifier.issue(user.id, now)?;
        info!(user_id = user.id, "Web login succeeded");
        Ok((token, user))
    }

    /// Set or replace a user's web credentials, hashing the password
    pub async fn set_web_credentials(&self, user_id: i64, login: &str, password: &str) -> Result<User> {
        let login = login.trim();
        if login.is_empty() {
            return Err(MaganteError::Validation("Login must not be empty".to_string()));
        }
        if password.len() < 8 {
            return Err(MaganteError::Validation("Password must be at least 8 characters".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self.store.set_web_credentials(user_id, login, &password_hash).await?;
        info!(user_id = user_id, "Web credentials updated");
        Ok(user)
    }

    /// Resolve a principal to its ledger row
    pub async fn current_user(&self, principal: &Principal) -> Result<User> {
        self.store
            .find_user_by_id(principal.user_id)
            .await?
            .ok_or(MaganteError::Auth(AuthRejection::Invalid))
    }
}
