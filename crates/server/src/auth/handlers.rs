//! # Authentication Handlers
//!
//! Login and administrative unlock. The lockout transition logic lives in
//! the auth crate; these handlers persist its outcome. `blocked` and
//! `failed_attempts` are mutated here and nowhere else.

use ::auth::{
    create_session_token,
    lockout::{LockState, LockoutPolicy},
    secrecy::SecretString,
    verify_password,
};
use axum::{extract::Path, Json};
use chrono::Utc;
use entity::users::{self, Entity as UsersEntity};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, SessionUser, SuccessResponse},
    middleware::auth::SessionContext,
    params::AuthParams,
    AppState,
};

/// Same message for unknown email and wrong password, so login responses
/// cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Email ou mot de passe invalide";

const ACCOUNT_LOCKED_MESSAGE: &str = "Compte bloqué après trop de tentatives échouées";

/// Inner handler for the login endpoint.
///
/// Walks the lockout machine: a locked account is rejected before the
/// credential is even compared; a bad credential increments the counter
/// and may lock; a good credential resets the counter and issues a signed
/// session token whose lifetime comes from the config store.
pub async fn login_handler_inner(state: &AppState, req: LoginRequest) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let params = AuthParams::new(&state.db);
    let policy = LockoutPolicy::new(params.max_login_attempts().await?);

    let user = UsersEntity::find()
        .filter(users::Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    if policy.state_of(user.blocked) == LockState::Locked {
        return Err(AppError::account_locked(ACCOUNT_LOCKED_MESSAGE));
    }

    let password = SecretString::from(req.password);
    if verify_password(&password, &user.password_hash).is_err() {
        let outcome = policy.register_failure(user.failed_attempts);
        let locked = outcome.state == LockState::Locked;

        let email = user.email.clone();
        let mut active: users::ActiveModel = user.into();
        active.failed_attempts = Set(outcome.attempts);
        active.blocked = Set(locked);
        active.updated_at = Set(Utc::now());
        active.update(&state.db).await?;

        if locked {
            warn!(email = %email, attempts = outcome.attempts, "Account locked after repeated failures");
        }
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    // Successful login resets the counter.
    let mut active: users::ActiveModel = user.into();
    active.failed_attempts = Set(0);
    active.updated_at = Set(Utc::now());
    let user = active.update(&state.db).await?;

    let ttl_minutes = params.session_duration_minutes().await?;
    let token = create_session_token(
        &state.jwt_config,
        user.id,
        &user.email,
        &user.role.to_string(),
        ttl_minutes * 60,
    )?;

    info!(user_id = user.id, email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: SessionUser::from(user),
    }))
}

/// Inner handler for the administrative unlock endpoint.
///
/// The only way out of the LOCKED state: clears the blocked flag and the
/// failed-attempt counter.
pub async fn reset_lock_handler_inner(
    state: &AppState,
    ctx: &SessionContext,
    Path(user_id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    ctx.require_manager()?;

    let user = UsersEntity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Utilisateur {} introuvable", user_id)))?;

    let email = user.email.clone();
    let mut active: users::ActiveModel = user.into();
    active.blocked = Set(false);
    active.failed_attempts = Set(0);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!(user_id, email = %email, unlocked_by = ctx.user_id, "Account unlocked");

    Ok(Json(SuccessResponse {
        success: true,
        message: "Compte débloqué".to_string(),
    }))
}
