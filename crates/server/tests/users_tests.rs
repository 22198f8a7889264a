//! Tests for the user administration endpoints.

mod common;

use axum::{extract::Path, Json};
use common::{create_user, session_for, setup_state};
use entity::UserRole;
use error::AppError;
use server::{
    auth::users::{
        create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
        update_user_handler,
    },
    dto::users::{CreateUserRequest, UpdateUserRequest},
};

fn create_req(username: &str, email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email:    email.to_string(),
        password: password.to_string(),
        role:     None,
    }
}

#[tokio::test]
async fn create_and_fetch_user() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    let created = create_user_handler(&state, &ctx, Json(create_req("alice", "alice@x.com", "Secret123")))
        .await
        .unwrap();
    assert_eq!(created.role, "reporter");
    assert!(!created.blocked);

    let fetched = get_user_handler(&state, &ctx, Path(created.id)).await.unwrap();
    assert_eq!(fetched.email, "alice@x.com");

    let all = list_users_handler(&state, &ctx).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    create_user_handler(&state, &ctx, Json(create_req("alice", "alice@x.com", "Secret123")))
        .await
        .unwrap();

    let duplicate =
        create_user_handler(&state, &ctx, Json(create_req("bob", "alice@x.com", "Secret456"))).await;
    assert!(matches!(duplicate, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    let weak = create_user_handler(&state, &ctx, Json(create_req("alice", "alice@x.com", "abc"))).await;
    assert!(matches!(weak, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    let req = CreateUserRequest {
        role: Some("superadmin".to_string()),
        ..create_req("alice", "alice@x.com", "Secret123")
    };
    let result = create_user_handler(&state, &ctx, Json(req)).await;
    assert!(matches!(result, Err(AppError::BadRequest { .. })));
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    let created = create_user_handler(&state, &ctx, Json(create_req("alice", "alice@x.com", "Secret123")))
        .await
        .unwrap();

    let updated = update_user_handler(
        &state,
        &ctx,
        Path(created.id),
        Json(UpdateUserRequest {
            role: Some("manager".to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    assert_eq!(updated.role, "manager");
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.email, "alice@x.com");
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let ctx = session_for(&manager);

    let created = create_user_handler(&state, &ctx, Json(create_req("alice", "alice@x.com", "Secret123")))
        .await
        .unwrap();

    delete_user_handler(&state, &ctx, Path(created.id)).await.unwrap();

    let missing = get_user_handler(&state, &ctx, Path(created.id)).await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn non_manager_cannot_administer_users() {
    let state = setup_state().await;
    let reporter = create_user(&state, "agent@mairie.mg", "Chantier2024", UserRole::Reporter).await;
    let ctx = session_for(&reporter);

    let result = list_users_handler(&state, &ctx).await;
    assert!(matches!(result, Err(AppError::Forbidden { .. })));
}
