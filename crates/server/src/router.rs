//! # API Router Configuration
//!
//! Configures API routes for the Routier application.

use axum::{
    extract::{Extension, Path, State as AxumState},
    middleware,
    routing::{get, post, put},
    Json,
    Router,
};
use error::Result;

use crate::{middleware::auth::SessionContext, AppState};

/// Creates the API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Protected routes that require a valid session token
    let protected_routes = Router::new()
        .route("/auth/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/auth/users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/auth/reset-lock/:id", post(reset_lock_handler))
        .route("/auth/params", get(list_params_handler))
        .route(
            "/auth/params/:key",
            get(get_param_handler).put(update_param_handler),
        )
        .route("/travaux", post(create_work_order_handler))
        .route("/travaux/:id", put(update_work_order_handler))
        .route("/signalements/:id", put(edit_report_handler))
        .route("/sync/utilisateurs", post(sync_users_handler))
        .route("/sync/signalements", post(import_reports_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // Public routes
    let public_routes = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/signalements", get(list_reports_handler))
        .route("/entreprises", get(list_companies_handler));

    public_routes.merge(protected_routes).with_state(state)
}

/// Wrapper handler for the login endpoint
async fn login_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::auth::LoginRequest>,
) -> Result<Json<crate::dto::auth::LoginResponse>> {
    crate::auth::handlers::login_handler_inner(&state, req).await
}

/// Wrapper handler for the administrative unlock endpoint
async fn reset_lock_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(user_id): Path<i32>,
) -> Result<Json<crate::dto::auth::SuccessResponse>> {
    crate::auth::handlers::reset_lock_handler_inner(&state, &ctx, Path(user_id)).await
}

/// Wrapper handler for listing users
async fn list_users_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<Vec<crate::dto::users::UserResponse>>> {
    crate::auth::users::list_users_handler(&state, &ctx).await
}

/// Wrapper handler for fetching one user
async fn get_user_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(user_id): Path<i32>,
) -> Result<Json<crate::dto::users::UserResponse>> {
    crate::auth::users::get_user_handler(&state, &ctx, Path(user_id)).await
}

/// Wrapper handler for creating a user
async fn create_user_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(req): Json<crate::dto::users::CreateUserRequest>,
) -> Result<Json<crate::dto::users::UserResponse>> {
    crate::auth::users::create_user_handler(&state, &ctx, Json(req)).await
}

/// Wrapper handler for updating a user
async fn update_user_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(user_id): Path<i32>,
    Json(req): Json<crate::dto::users::UpdateUserRequest>,
) -> Result<Json<crate::dto::users::UserResponse>> {
    crate::auth::users::update_user_handler(&state, &ctx, Path(user_id), Json(req)).await
}

/// Wrapper handler for deleting a user
async fn delete_user_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(user_id): Path<i32>,
) -> Result<Json<crate::dto::auth::SuccessResponse>> {
    crate::auth::users::delete_user_handler(&state, &ctx, Path(user_id)).await
}

/// Wrapper handler for listing auth parameters
async fn list_params_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<Vec<crate::params::ParamResponse>>> {
    crate::params::list_params_handler(&state, &ctx).await
}

/// Wrapper handler for fetching one auth parameter
async fn get_param_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(key): Path<String>,
) -> Result<Json<crate::params::ParamResponse>> {
    crate::params::get_param_handler(&state, &ctx, Path(key)).await
}

/// Wrapper handler for updating an auth parameter
async fn update_param_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(key): Path<String>,
    Json(req): Json<crate::params::UpdateParamRequest>,
) -> Result<Json<crate::params::ParamResponse>> {
    crate::params::update_param_handler(&state, &ctx, Path(key), Json(req)).await
}

/// Wrapper handler for the merged report view
async fn list_reports_handler(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<Vec<reconcile::ReportView>>> {
    crate::reports::list_reports_handler(&state).await
}

/// Wrapper handler for editing a report
async fn edit_report_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(report_id): Path<i32>,
    Json(req): Json<crate::dto::reports::EditReportRequest>,
) -> Result<Json<crate::dto::reports::EditReportResponse>> {
    crate::reports::edit_report_handler_inner(&state, &ctx, Path(report_id), Json(req)).await
}

/// Wrapper handler for the user synchronization trigger
async fn sync_users_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<reconcile::engine::SyncSummary>> {
    crate::reports::sync_users_handler_inner(&state, &ctx).await
}

/// Wrapper handler for the report import trigger
async fn import_reports_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<reconcile::engine::ImportSummary>> {
    crate::reports::import_reports_handler_inner(&state, &ctx).await
}

/// Wrapper handler for the company lookup
async fn list_companies_handler(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<Vec<crate::dto::works::CompanyResponse>>> {
    crate::works::list_companies_handler(&state).await
}

/// Wrapper handler for creating a work order
async fn create_work_order_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(req): Json<crate::dto::works::CreateWorkOrderRequest>,
) -> Result<Json<crate::dto::works::WorkOrderResponse>> {
    crate::works::create_work_order_handler_inner(&state, &ctx, Json(req)).await
}

/// Wrapper handler for updating a work order
async fn update_work_order_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(work_order_id): Path<i32>,
    Json(req): Json<crate::dto::works::UpdateWorkOrderRequest>,
) -> Result<Json<crate::dto::works::WorkOrderResponse>> {
    crate::works::update_work_order_handler_inner(&state, &ctx, Path(work_order_id), Json(req)).await
}

/// Creates the health check router
pub fn create_health_router() -> Router { Router::new().route("/health", get(|| async { "OK" })) }

/// Creates the main application router
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state))
}
