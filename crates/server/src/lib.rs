//! # Routier API Server
//!
//! Axum-based HTTP surface over the reconciliation and account-security
//! core.
//!
//! ## Modules
//!
//! - [`auth`]: login, lockout, and user administration endpoints
//! - [`params`]: runtime auth parameters (the config store)
//! - [`reports`]: merged report view, report edits, sync triggers
//! - [`works`]: company lookup and work-order endpoints
//! - [`dto`]: request/response data transfer objects
//! - [`middleware`]: session-token validation
//! - [`router`]: API route configuration

use std::sync::Arc;

pub mod auth;
pub mod dto;
pub mod middleware;
pub mod params;
pub mod reports;
pub mod router;
pub mod works;

pub use router::create_app_router;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = error::AppError> = std::result::Result<T, E>;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Primary-store connection pool
    pub db:         sea_orm::DbConn,
    /// Secondary document store
    pub docs:       Arc<dyn reconcile::DocumentStore>,
    /// Session-token signing configuration
    pub jwt_config: ::auth::JwtConfig,
    /// Server start time for uptime reporting
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build a reconciliation engine over this state's store handles.
    #[must_use]
    pub fn engine(&self) -> reconcile::ReconciliationEngine {
        reconcile::ReconciliationEngine::new(self.db.clone(), self.docs.clone())
    }
}
