//! # API Response Types
//!
//! Generic API response envelope and the axum response conversion for
//! [`AppError`].
//!
//! ## Error Format
//!
//! ```json
//! {
//!   "success": false,
//!   "code": "ACCOUNT_LOCKED",
//!   "message": "Compte bloqué après trop de tentatives"
//! }
//! ```

use axum::{body::Body, response::Response};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// API response type used for success and error bodies alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Indicates operation success (always `true`).
        success: bool,
        /// Response data.
        data: T,
    },

    /// Error response.
    Error {
        /// Indicates operation success (always `false`).
        success: bool,
        /// Stable error code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl<T> ApiResponse<T> {
    /// Create a success response wrapping `data`.
    #[inline]
    pub fn success(data: T) -> Self {
        Self::Success {
            success: true,
            data,
        }
    }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        Self::Error {
            success: false,
            code:    code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Convert an [`AppError`] into its HTTP response.
///
/// Internal-class errors (database, IO, config) hide their detail behind a
/// generic message; client-facing errors keep theirs.
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            "Une erreur interne est survenue".to_string()
        }
        else {
            self.message()
        };

        let body = ApiResponse::<()>::error(self.code(), message);

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::to_string(&body).unwrap_or_else(|_| "{\"success\":false}".to_string()),
            ))
            .unwrap_or_else(|_| Response::new(Body::empty()))
    }
}
