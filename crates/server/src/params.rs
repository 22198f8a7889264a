//! # Auth Parameter Handlers
//!
//! The config store: flat key/value/description triples read by the auth
//! gateway on every authentication evaluation. A `set` overwrites in place
//! and takes effect on the next read; already-issued session tokens are
//! not revisited.

use axum::{extract::Path, Json};
use entity::auth_params::{self, Entity as AuthParamsEntity};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, DbConn, EntityTrait, PaginatorTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{middleware::auth::SessionContext, AppState};

/// Maximum failed login attempts before an account is blocked.
pub const PARAM_MAX_ATTEMPTS: &str = "limite_tentatives";
/// Session-token lifetime, in minutes.
pub const PARAM_SESSION_MINUTES: &str = "duree_session_minutes";
/// Displayed lock duration. Advisory only: unlocking is a manual action,
/// no timed transition exists.
pub const PARAM_LOCK_MINUTES: &str = "duree_blocage_minutes";

const DEFAULT_MAX_ATTEMPTS: i32 = 3;
const DEFAULT_SESSION_MINUTES: u64 = 60;

/// Default parameters to seed on first run
const DEFAULT_PARAMS: &[(&str, &str, &str)] = &[
    (
        PARAM_MAX_ATTEMPTS,
        "3",
        "Nombre maximum de tentatives de connexion échouées avant blocage du compte.",
    ),
    (
        PARAM_SESSION_MINUTES,
        "60",
        "Durée de validité d'un jeton de session, en minutes.",
    ),
    (
        PARAM_LOCK_MINUTES,
        "30",
        "Durée de blocage affichée aux gestionnaires. Indicative: le déblocage reste une action \
         manuelle.",
    ),
];

/// Seed default parameters if the table is empty
pub async fn seed_default_params(db: &DbConn) -> Result<()> {
    let count = AuthParamsEntity::find().count(db).await?;

    if count == 0 {
        info!("Seeding default auth parameters...");

        for (key, value, description) in DEFAULT_PARAMS {
            auth_params::ActiveModel {
                key:         Set(key.to_string()),
                value:       Set(value.to_string()),
                description: Set(Some(description.to_string())),
            }
            .insert(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed parameter {}: {}", key, e)))?;
        }

        info!("Default auth parameters seeded");
    }

    Ok(())
}

/// Read access to the auth parameters, with hard-coded defaults for
/// absent keys.
pub struct AuthParams<'a> {
    db: &'a DbConn,
}

impl<'a> AuthParams<'a> {
    /// Wrap a primary-store connection.
    #[must_use]
    pub fn new(db: &'a DbConn) -> Self {
        Self {
            db,
        }
    }

    /// Current value for a key, if present.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let param = AuthParamsEntity::find_by_id(key).one(self.db).await?;
        Ok(param.map(|p| p.value))
    }

    /// Current value for a key, or the provided default when absent.
    pub async fn get_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get(key).await?.unwrap_or_else(|| default.to_string()))
    }

    /// The configured failed-attempt maximum. An unparsable value falls
    /// back to the default with a warning rather than breaking logins.
    pub async fn max_login_attempts(&self) -> Result<i32> {
        let raw = self
            .get_or(PARAM_MAX_ATTEMPTS, &DEFAULT_MAX_ATTEMPTS.to_string())
            .await?;
        Ok(raw.parse().unwrap_or_else(|_| {
            warn!(key = PARAM_MAX_ATTEMPTS, value = %raw, "Unparsable parameter, using default");
            DEFAULT_MAX_ATTEMPTS
        }))
    }

    /// The configured session lifetime in minutes.
    pub async fn session_duration_minutes(&self) -> Result<u64> {
        let raw = self
            .get_or(PARAM_SESSION_MINUTES, &DEFAULT_SESSION_MINUTES.to_string())
            .await?;
        Ok(raw.parse().unwrap_or_else(|_| {
            warn!(key = PARAM_SESSION_MINUTES, value = %raw, "Unparsable parameter, using default");
            DEFAULT_SESSION_MINUTES
        }))
    }

    /// Overwrite a parameter in place, creating it when absent. Takes
    /// effect on the next read.
    pub async fn set(&self, key: &str, value: &str) -> Result<auth_params::Model> {
        let existing = AuthParamsEntity::find_by_id(key).one(self.db).await?;

        let updated = match existing {
            Some(param) => {
                let mut active: auth_params::ActiveModel = param.into();
                active.value = Set(value.to_string());
                active.update(self.db).await?
            },
            None => {
                auth_params::ActiveModel {
                    key:         Set(key.to_string()),
                    value:       Set(value.to_string()),
                    description: Set(None),
                }
                .insert(self.db)
                .await?
            },
        };

        debug!(key = %key, "Auth parameter updated");
        Ok(updated)
    }
}

/// Response type for a single parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamResponse {
    pub key:         String,
    pub value:       String,
    pub description: Option<String>,
}

impl From<auth_params::Model> for ParamResponse {
    fn from(param: auth_params::Model) -> Self {
        Self {
            key:         param.key,
            value:       param.value,
            description: param.description,
        }
    }
}

/// Request type for updating a parameter
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct UpdateParamRequest {
    #[validate(length(min = 1, message = "La valeur ne peut pas être vide"))]
    pub value: String,
}

/// List all parameters (manager only)
pub async fn list_params_handler(state: &AppState, ctx: &SessionContext) -> Result<Json<Vec<ParamResponse>>> {
    ctx.require_manager()?;

    let params = AuthParamsEntity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(ParamResponse::from)
        .collect();

    Ok(Json(params))
}

/// Get a single parameter by key (manager only)
pub async fn get_param_handler(
    state: &AppState,
    ctx: &SessionContext,
    Path(key): Path<String>,
) -> Result<Json<ParamResponse>> {
    ctx.require_manager()?;

    let param = AuthParamsEntity::find_by_id(key.as_str())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Paramètre '{}' introuvable", key)))?;

    Ok(Json(param.into()))
}

/// Update a parameter by key (manager only)
pub async fn update_param_handler(
    state: &AppState,
    ctx: &SessionContext,
    Path(key): Path<String>,
    Json(req): Json<UpdateParamRequest>,
) -> Result<Json<ParamResponse>> {
    ctx.require_manager()?;
    req.validate()?;

    let updated = AuthParams::new(&state.db).set(&key, &req.value).await?;

    info!(key = %key, "Auth parameter changed");
    Ok(Json(updated.into()))
}
