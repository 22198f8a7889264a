//! # Session Middleware
//!
//! Validates the bearer session token on protected routes and installs an
//! explicit [`SessionContext`] in the request extensions. The context is
//! created here (from a token issued at login) and torn down with the
//! request; no handler reads ambient global session state.
//!
//! Invalid or expired tokens are rejected with 403, the signal that makes
//! clients discard their session.

use std::str::FromStr;

use ::auth::jwt::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::UserRole;
use error::AppError;

use crate::AppState;

/// Per-request session information extracted from a validated token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Numeric user id
    pub user_id: i32,
    /// User email
    pub email:   String,
    /// Role claim
    pub role:    UserRole,
}

impl SessionContext {
    /// Reject callers that are not managers.
    pub fn require_manager(&self) -> crate::Result<()> {
        if self.role == UserRole::Manager {
            Ok(())
        }
        else {
            Err(AppError::forbidden("Réservé aux gestionnaires"))
        }
    }
}

/// Session-token validation middleware.
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates signature, issuer, and expiry
/// 3. Installs a [`SessionContext`] in the request extensions
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AppError::JwtInvalidToken.into_response();
    };

    let Some(token) = extract_bearer_token(auth_header) else {
        return AppError::JwtInvalidToken.into_response();
    };

    let claims = match validate_token(&state.jwt_config, &token) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    let (Ok(user_id), Ok(role)) = (claims.sub.parse::<i32>(), UserRole::from_str(&claims.role)) else {
        return AppError::JwtInvalidToken.into_response();
    };

    request.extensions_mut().insert(SessionContext {
        user_id,
        email: claims.email,
        role,
    });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_manager() {
        let manager = SessionContext {
            user_id: 1,
            email:   "m@example.com".to_string(),
            role:    UserRole::Manager,
        };
        assert!(manager.require_manager().is_ok());

        let reporter = SessionContext {
            role: UserRole::Reporter,
            ..manager
        };
        assert!(matches!(
            reporter.require_manager(),
            Err(AppError::Forbidden { .. })
        ));
    }
}
