//! API key verification and issuance.

use crate::{config::AuthConfig, error::ApiError};
use actix_web::HttpRequest;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Request header carrying the signed API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Claims embedded in an issued API key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyClaims {
    /// Name of the client the key was issued to
    pub client: String,
    /// Expiry as seconds since the epoch
    pub exp: i64,
}

/// Validate the API key presented on a protected request.
///
/// Missing and invalid/expired keys are both rejected with 401; the check
/// is fail-closed and has no side effects.
pub fn verify_api_key(req: &HttpRequest, config: &AuthConfig) -> Result<ApiKeyClaims, ApiError> {
    let token = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Auth("API key missing".to_string()))?;

    decode::<ApiKeyClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Auth("Invalid or expired API key".to_string()))
}

/// Issue a signed, time-limited API key for `client`.
pub fn generate_api_key(
    config: &AuthConfig,
    client: &str,
    ttl_days: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = ApiKeyClaims {
        client: client.to_string(),
        exp: (Utc::now() + chrono::Duration::days(ttl_days)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
