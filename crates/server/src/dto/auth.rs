//! # Authentication Data Transfer Objects
//!
//! Request and response types for authentication endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for user login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 1, message = "Mot de passe requis"))]
    pub password: String,
}

/// User information returned after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    /// Numeric user id
    pub id: i32,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Role embedded in the session token
    pub role: String,
}

impl From<entity::users::Model> for SessionUser {
    fn from(user: entity::users::Model) -> Self {
        Self {
            id:       user.id,
            username: user.username,
            email:    user.email,
            role:     user.role.to_string(),
        }
    }
}

/// Success response for login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// Bearer session token
    pub token: String,

    /// The authenticated user
    pub user: SessionUser,
}

/// Generic success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    /// Indicates operation success
    pub success: bool,

    /// Human-readable message
    pub message: String,
}
