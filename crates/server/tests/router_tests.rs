//! Router-level tests: public vs protected routes and the 403 contract
//! for invalid session tokens.

mod common;

use axum::body::Body;
use common::{create_user, setup_state};
use entity::UserRole;
use http::{header, Request, StatusCode};
use server::create_app_router;
use tower::ServiceExt;

async fn token_for(state: &server::AppState, email: &str, password: &str) -> String {
    let response = server::auth::handlers::login_handler_inner(
        state,
        server::dto::auth::LoginRequest {
            email:    email.to_string(),
            password: password.to_string(),
        },
    )
    .await
    .unwrap();
    response.token.clone()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let state = setup_state().await;
    let app = create_app_router(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn merged_view_is_public() {
    let state = setup_state().await;
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signalements")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_rejected_with_403() {
    let state = setup_state().await;
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn garbage_token_is_rejected_with_403() {
    let state = setup_state().await;
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/users")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn manager_token_reaches_protected_routes() {
    let state = setup_state().await;
    create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let token = token_for(&state, "chef@mairie.mg", "Chantier2024").await;
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reporter_token_is_forbidden_on_admin_routes() {
    let state = setup_state().await;
    create_user(&state, "agent@mairie.mg", "Chantier2024", UserRole::Reporter).await;
    let token = token_for(&state, "agent@mairie.mg", "Chantier2024").await;
    let app = create_app_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/users")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn locked_account_login_returns_423_over_http() {
    let state = setup_state().await;
    create_user(&state, "agent@mairie.mg", "Chantier2024", UserRole::Reporter).await;

    // Exhaust the default threshold.
    for _ in 0 .. 3 {
        let _ = server::auth::handlers::login_handler_inner(
            &state,
            server::dto::auth::LoginRequest {
                email:    "agent@mairie.mg".to_string(),
                password: "mauvais".to_string(),
            },
        )
        .await;
    }

    let app = create_app_router(state);
    let body = serde_json::json!({"email": "agent@mairie.mg", "password": "Chantier2024"});
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::LOCKED);
}
