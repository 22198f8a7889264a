//! # User Administration Handlers
//!
//! CRUD over primary-store users, keyed by numeric id. All endpoints are
//! manager-only. Lockout fields are read-only here; they change through
//! login and the unlock endpoint.

use std::str::FromStr;

use ::auth::{hash_password, secrecy::SecretString, validate_password_strength};
use axum::{extract::Path, Json};
use chrono::Utc;
use entity::{
    users::{self, Entity as UsersEntity},
    UserRole,
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserResponse},
    dto::auth::SuccessResponse,
    middleware::auth::SessionContext,
    AppState,
};

fn parse_role(role: Option<&str>) -> Result<UserRole> {
    match role {
        None => Ok(UserRole::Reporter),
        Some(raw) => {
            UserRole::from_str(raw).map_err(|_| AppError::bad_request(format!("Rôle inconnu: {}", raw)))
        },
    }
}

fn check_password_strength(password: &str) -> Result<()> {
    validate_password_strength(password).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        AppError::validation(messages.join(", "))
    })
}

/// List all users (manager only)
pub async fn list_users_handler(state: &AppState, ctx: &SessionContext) -> Result<Json<Vec<UserResponse>>> {
    ctx.require_manager()?;

    let users = UsersEntity::find()
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

/// Get one user by id (manager only)
pub async fn get_user_handler(
    state: &AppState,
    ctx: &SessionContext,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>> {
    ctx.require_manager()?;

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Utilisateur {} introuvable", user_id)))?;

    Ok(Json(user.into()))
}

/// Create a user (manager only)
pub async fn create_user_handler(
    state: &AppState,
    ctx: &SessionContext,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>> {
    ctx.require_manager()?;
    req.validate()?;
    check_password_strength(&req.password)?;

    let existing = UsersEntity::find()
        .filter(users::Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict(format!("Email déjà utilisé: {}", req.email)));
    }

    let role = parse_role(req.role.as_deref())?;
    let password_hash = hash_password(&SecretString::from(req.password))
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now();
    let user = users::ActiveModel {
        username: Set(req.username),
        email: Set(req.email),
        password_hash: Set(password_hash),
        role: Set(role),
        blocked: Set(false),
        failed_attempts: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(user_id = user.id, email = %user.email, created_by = ctx.user_id, "User created");

    Ok(Json(user.into()))
}

/// Update a user (manager only). Absent fields are left unchanged.
pub async fn update_user_handler(
    state: &AppState,
    ctx: &SessionContext,
    Path(user_id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    ctx.require_manager()?;
    req.validate()?;

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Utilisateur {} introuvable", user_id)))?;

    if let Some(email) = &req.email {
        if *email != user.email {
            let taken = UsersEntity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::conflict(format!("Email déjà utilisé: {}", email)));
            }
        }
    }

    let mut active: users::ActiveModel = user.into();
    if let Some(username) = req.username {
        active.username = Set(username);
    }
    if let Some(email) = req.email {
        active.email = Set(email);
    }
    if let Some(password) = req.password {
        check_password_strength(&password)?;
        let password_hash = hash_password(&SecretString::from(password))
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
        active.password_hash = Set(password_hash);
    }
    if let Some(role) = req.role {
        active.role = Set(parse_role(Some(&role))?);
    }
    active.updated_at = Set(Utc::now());
    let user = active.update(&state.db).await?;

    info!(user_id = user.id, updated_by = ctx.user_id, "User updated");

    Ok(Json(user.into()))
}

/// Delete a user (manager only)
pub async fn delete_user_handler(
    state: &AppState,
    ctx: &SessionContext,
    Path(user_id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    ctx.require_manager()?;

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Utilisateur {} introuvable", user_id)))?;

    user.delete(&state.db).await?;

    info!(user_id, deleted_by = ctx.user_id, "User deleted");

    Ok(Json(SuccessResponse {
        success: true,
        message: "Utilisateur supprimé".to_string(),
    }))
}
