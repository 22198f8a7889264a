//! # Authentication Service
//!
//! Account-security building blocks:
//! - Session-token (JWT) management
//! - Password hashing and validation
//! - The failed-login lockout state machine
//!
//! The persistence side of authentication (reading users, storing
//! counters) lives in the server crate; everything here is pure or
//! store-agnostic.

pub mod jwt;
pub mod lockout;
pub mod password;

// Re-export commonly used types
pub use jwt::{create_session_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use lockout::{LockState, LockoutPolicy};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use secrecy;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = error::AppError> = std::result::Result<T, E>;
