//! # Routier Error Infrastructure
//!
//! Error types and API response handling shared by every Routier crate.

pub mod response;

pub use response::ApiResponse;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
///
/// The variants map onto the failure taxonomy of the service: transport
/// failures against the secondary store, authorization failures (which end
/// the current session, not the process), validation rejections that happen
/// before any write, and lookup/storage errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound { message: String },

    #[error("BadRequest: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("AccountLocked: {message}")]
    AccountLocked { message: String },

    #[error("JwtExpired: Token has expired")]
    JwtExpired,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation: {message}")]
    Validation { message: String },

    #[error("Transport: {message}")]
    Transport { message: String },

    #[error("Internal: {message}")]
    Internal { message: String },

    #[error("Database: {message}")]
    Database { message: String },

    #[error("IO: {message}")]
    Io { message: String },

    #[error("Config: {message}")]
    Config { message: String },

    #[error("Migration: {message}")]
    Migration { message: String },
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create an account-locked error.
    #[inline]
    pub fn account_locked(message: impl ToString) -> Self {
        Self::AccountLocked {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create a transport error (secondary store or outbound request failed).
    #[inline]
    pub fn transport(message: impl ToString) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    ///
    /// Token errors map to 403 rather than 401: a 403 from this service
    /// tells the client its session is invalid/expired and must be torn down.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound { .. } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => http::StatusCode::UNAUTHORIZED,
            AppError::AccountLocked { .. } => http::StatusCode::LOCKED,
            AppError::JwtExpired => http::StatusCode::FORBIDDEN,
            AppError::JwtInvalidToken => http::StatusCode::FORBIDDEN,
            AppError::Forbidden { .. } => http::StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => http::StatusCode::CONFLICT,
            AppError::Validation { .. } => http::StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transport { .. } => http::StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Migration { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::AccountLocked { .. } => "ACCOUNT_LOCKED",
            AppError::JwtExpired => "JWT_EXPIRED",
            AppError::JwtInvalidToken => "JWT_INVALID_TOKEN",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Transport { .. } => "TRANSPORT_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Io { .. } => "IO_ERROR",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Migration { .. } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::JwtExpired => "Token has expired".to_string(),
            AppError::JwtInvalidToken => "Invalid token".to_string(),
            AppError::NotFound { message }
            | AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::AccountLocked { message }
            | AppError::Forbidden { message }
            | AppError::Conflict { message }
            | AppError::Validation { message }
            | AppError::Transport { message }
            | AppError::Internal { message }
            | AppError::Database { message }
            | AppError::Io { message }
            | AppError::Config { message }
            | AppError::Migration { message } => message.clone(),
        }
    }

    /// Add context to the error message, keeping the variant.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let prefix = context.to_string();
        match self {
            AppError::JwtExpired | AppError::JwtInvalidToken => self,
            AppError::NotFound { message } => Self::NotFound {
                message: format!("{}: {}", prefix, message),
            },
            AppError::BadRequest { message } => Self::BadRequest {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Unauthorized { message } => Self::Unauthorized {
                message: format!("{}: {}", prefix, message),
            },
            AppError::AccountLocked { message } => Self::AccountLocked {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Forbidden { message } => Self::Forbidden {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Conflict { message } => Self::Conflict {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Validation { message } => Self::Validation {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Transport { message } => Self::Transport {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Internal { message } => Self::Internal {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Database { message } => Self::Database {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Io { message } => Self::Io {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Config { message } => Self::Config {
                message: format!("{}: {}", prefix, message),
            },
            AppError::Migration { message } => Self::Migration {
                message: format!("{}: {}", prefix, message),
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert serde_json errors to AppError.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest {
            message: format!("Malformed JSON: {}", err),
        }
    }
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| {
                errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let err = AppError::not_found("User");
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_error_unauthorized() {
        let err = AppError::unauthorized("Bad credentials");
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_error_account_locked() {
        let err = AppError::account_locked("Account blocked after repeated failures");
        assert_eq!(err.status(), http::StatusCode::LOCKED);
        assert_eq!(err.code(), "ACCOUNT_LOCKED");
    }

    #[test]
    fn test_token_errors_are_forbidden() {
        // 403 is the signal that forces client-side session teardown.
        assert_eq!(AppError::JwtExpired.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::JwtInvalidToken.status(),
            http::StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_error_validation() {
        let err = AppError::validation("progress out of range");
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_error_transport() {
        let err = AppError::transport("document store unreachable");
        assert_eq!(err.status(), http::StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "TRANSPORT_ERROR");
    }

    #[test]
    fn test_error_context() {
        let err = AppError::not_found("report 42").context("applying edit");
        assert_eq!(err.message(), "applying edit: report 42");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_context_keeps_jwt_variants() {
        let err = AppError::JwtExpired.context("ignored");
        assert_eq!(err.message(), "Token has expired");
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io_err.into();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct TestStruct {
            #[validate(range(min = 0, max = 100))]
            progress: i32,
        }

        let s = TestStruct {
            progress: 150,
        };
        let errors = s.validate().unwrap_err();
        let err: AppError = errors.into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
