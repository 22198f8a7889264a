//! # Session Token Management
//!
//! Signed, self-describing bearer tokens. Validity is checked per request
//! against signature and expiry only; there is no server-side revocation
//! list, so a token stays valid until it expires or the client discards it.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use cuid2::CuidConstructor;
use error::AppError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::Result;

/// JWT signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token issuer
    pub issuer: String,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (numeric user id, stringified)
    pub sub: String,

    /// User email
    pub email: String,

    /// User role
    pub role: String,

    /// Token issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new signed session token.
///
/// The expiry is supplied by the caller because the session duration is a
/// runtime-configurable parameter, read on every login.
///
/// # Errors
///
/// Returns an error if token encoding fails.
pub fn create_session_token(
    config: &JwtConfig,
    user_id: i32,
    email: &str,
    role: &str,
    ttl_seconds: u64,
) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = (now + Duration::from_secs(ttl_seconds)).as_secs();

    let claims = Claims {
        sub:   user_id.to_string(),
        email: email.to_string(),
        role:  role.to_string(),
        iss:   config.issuer.clone(),
        exp:   expiration,
        iat:   issued_at,
        jti:   CuidConstructor::new().with_length(24).create_id(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a session token and returns its claims.
///
/// # Errors
///
/// Returns [`AppError::JwtExpired`] for an expired token and
/// [`AppError::JwtInvalidToken`] for any other validation failure; both map
/// to a 403 response, which clients treat as a session-teardown signal.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

    let mut validation = Validation::default();
    let mut iss_set = HashSet::new();
    iss_set.insert(config.issuer.clone());
    validation.iss = Some(iss_set);
    validation.validate_exp = true;

    let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::JwtExpired,
            _ => AppError::JwtInvalidToken,
        }
    })?;

    Ok(data.claims)
}

/// Extracts the Bearer token from an Authorization header value.
///
/// Returns `None` when the header is not a non-empty `Bearer` credential.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    if !auth_header.starts_with("Bearer ") {
        return None;
    }

    let token = auth_header.trim_start_matches("Bearer ").trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-that-is-at-least-32-bytes-long".to_string(),
            issuer: "routier-test".to_string(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = test_config();

        let token = create_session_token(&config, 42, "manager@example.com", "manager", 3600)
            .expect("Failed to create token");

        assert!(!token.is_empty());

        let claims = validate_token(&config, &token).expect("Failed to validate token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "manager@example.com");
        assert_eq!(claims.role, "manager");
        assert_eq!(claims.iss, "routier-test");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = create_session_token(&config, 1, "a@x.com", "reporter", 3600).unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-signing-secret!!".to_string(),
            issuer: config.issuer.clone(),
        };
        assert!(matches!(
            validate_token(&other, &token),
            Err(error::AppError::JwtInvalidToken)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_config();
        let token = create_session_token(&config, 1, "a@x.com", "reporter", 3600).unwrap();

        let other = JwtConfig {
            secret: config.secret.clone(),
            issuer: "someone-else".to_string(),
        };
        assert!(validate_token(&other, &token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test-token";
        let auth_header = format!("Bearer {}", token);

        let extracted = extract_bearer_token(&auth_header).expect("Failed to extract token");

        assert_eq!(extracted, token);
    }

    #[test]
    fn test_extract_bearer_token_invalid_format() {
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
