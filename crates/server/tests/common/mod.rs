//! # Common Test Utilities
//!
//! Shared test infrastructure: sqlite-backed app state, user fixtures,
//! and session contexts.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use auth::{hash_password, secrecy::SecretString, JwtConfig};
use chrono::Utc;
use entity::{users, UserRole};
use migration::{Migrator, MigratorTrait};
use reconcile::MemoryDocumentStore;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use server::{middleware::auth::SessionContext, AppState};

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Initialize the test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// App state over a fresh in-memory database, without parameter seeding.
pub async fn setup_state_unseeded() -> AppState {
    init_test_env();

    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    AppState {
        db,
        docs: Arc::new(MemoryDocumentStore::new()),
        jwt_config: JwtConfig {
            secret: "test-secret-key-that-is-at-least-32-bytes-long".to_string(),
            issuer: "routier-test".to_string(),
        },
        start_time: std::time::Instant::now(),
    }
}

/// App state with the default auth parameters seeded.
pub async fn setup_state() -> AppState {
    let state = setup_state_unseeded().await;
    server::params::seed_default_params(&state.db)
        .await
        .expect("seed params");
    state
}

/// Insert a user with a hashed password.
pub async fn create_user(state: &AppState, email: &str, password: &str, role: UserRole) -> users::Model {
    let password_hash =
        hash_password(&SecretString::from(password.to_string())).expect("hash password");
    let now = Utc::now();
    users::ActiveModel {
        username: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        blocked: Set(false),
        failed_attempts: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("insert user")
}

/// Session context for a stored user.
pub fn session_for(user: &users::Model) -> SessionContext {
    SessionContext {
        user_id: user.id,
        email:   user.email.clone(),
        role:    user.role,
    }
}
