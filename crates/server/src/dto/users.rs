//! # User Administration Data Transfer Objects

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username
    #[validate(length(min = 1, max = 100, message = "Nom d'utilisateur requis"))]
    pub username: String,

    /// Email address (unique across both stores)
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    /// Initial password
    #[validate(length(min = 1, message = "Mot de passe requis"))]
    pub password: String,

    /// Role name; defaults to `reporter` when absent
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for updating a user. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Nom d'utilisateur vide"))]
    pub username: Option<String>,

    #[validate(email(message = "Format d'email invalide"))]
    pub email: Option<String>,

    pub password: Option<String>,

    pub role: Option<String>,
}

/// User returned by the administration endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:              i32,
    pub username:        String,
    pub email:           String,
    pub role:            String,
    pub blocked:         bool,
    pub failed_attempts: i32,
    pub created_at:      String,
}

impl From<entity::users::Model> for UserResponse {
    fn from(user: entity::users::Model) -> Self {
        Self {
            id:              user.id,
            username:        user.username,
            email:           user.email,
            role:            user.role.to_string(),
            blocked:         user.blocked,
            failed_attempts: user.failed_attempts,
            created_at:      user.created_at.to_rfc3339(),
        }
    }
}
