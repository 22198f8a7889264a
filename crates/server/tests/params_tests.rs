//! Tests for the auth parameter store.

mod common;

use axum::{extract::Path, Json};
use common::{create_user, session_for, setup_state, setup_state_unseeded};
use entity::UserRole;
use error::AppError;
use server::params::{
    get_param_handler, list_params_handler, seed_default_params, update_param_handler, AuthParams,
    UpdateParamRequest, PARAM_MAX_ATTEMPTS, PARAM_SESSION_MINUTES,
};

#[tokio::test]
async fn absent_keys_fall_back_to_hard_coded_defaults() {
    let state = setup_state_unseeded().await;
    let params = AuthParams::new(&state.db);

    assert_eq!(params.get(PARAM_MAX_ATTEMPTS).await.unwrap(), None);
    assert_eq!(params.max_login_attempts().await.unwrap(), 3);
    assert_eq!(params.session_duration_minutes().await.unwrap(), 60);
}

#[tokio::test]
async fn set_takes_effect_on_next_read() {
    let state = setup_state().await;
    let params = AuthParams::new(&state.db);

    params.set(PARAM_SESSION_MINUTES, "15").await.unwrap();
    assert_eq!(params.session_duration_minutes().await.unwrap(), 15);
}

#[tokio::test]
async fn set_creates_missing_keys() {
    let state = setup_state_unseeded().await;
    let params = AuthParams::new(&state.db);

    params.set("nouvelle_cle", "42").await.unwrap();
    assert_eq!(params.get("nouvelle_cle").await.unwrap().as_deref(), Some("42"));
}

#[tokio::test]
async fn unparsable_value_falls_back_to_default() {
    let state = setup_state().await;
    let params = AuthParams::new(&state.db);

    params.set(PARAM_MAX_ATTEMPTS, "beaucoup").await.unwrap();
    assert_eq!(params.max_login_attempts().await.unwrap(), 3);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let state = setup_state().await;
    seed_default_params(&state.db).await.unwrap();

    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;
    let Json(params) = list_params_handler(&state, &session_for(&manager)).await.unwrap();
    assert_eq!(params.len(), 3);
}

#[tokio::test]
async fn handlers_enforce_manager_role_and_validation() {
    let state = setup_state().await;
    let reporter = create_user(&state, "agent@mairie.mg", "Chantier2024", UserRole::Reporter).await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;

    let forbidden = list_params_handler(&state, &session_for(&reporter)).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden { .. })));

    let empty = update_param_handler(
        &state,
        &session_for(&manager),
        Path(PARAM_MAX_ATTEMPTS.to_string()),
        Json(UpdateParamRequest {
            value: String::new(),
        }),
    )
    .await;
    assert!(matches!(empty, Err(AppError::Validation { .. })));

    let updated = update_param_handler(
        &state,
        &session_for(&manager),
        Path(PARAM_MAX_ATTEMPTS.to_string()),
        Json(UpdateParamRequest {
            value: "5".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.value, "5");

    let fetched = get_param_handler(
        &state,
        &session_for(&manager),
        Path(PARAM_MAX_ATTEMPTS.to_string()),
    )
    .await
    .unwrap();
    assert_eq!(fetched.value, "5");
}

#[tokio::test]
async fn missing_param_is_not_found() {
    let state = setup_state().await;
    let manager = create_user(&state, "chef@mairie.mg", "Chantier2024", UserRole::Manager).await;

    let result = get_param_handler(
        &state,
        &session_for(&manager),
        Path("inexistante".to_string()),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}
