//! # Server Bootstrap
//!
//! Connects the stores, applies migrations, seeds the default auth
//! parameters, and serves the API router.

use std::sync::Arc;

use error::{AppError, Result};
use migration::MigratorTrait;
use tracing::info;

use crate::ServeArgs;

pub async fn run(args: ServeArgs) -> Result<()> {
    let db = sea_orm::Database::connect(&args.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    server::params::seed_default_params(&db).await?;

    let docs = reconcile::FileDocumentStore::open(&args.documents_dir).await?;

    let state = server::AppState {
        db,
        docs: Arc::new(docs),
        jwt_config: auth::JwtConfig {
            secret: args.jwt_secret.clone(),
            issuer: args.jwt_issuer.clone(),
        },
        start_time: std::time::Instant::now(),
    };

    let router = server::create_app_router(state);

    let address = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind {}: {}", address, e)))?;

    info!(address = %address, "Routier API listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
