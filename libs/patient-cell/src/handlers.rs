use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthPayload;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PatientProfile, RegisterPatientRequest,
    UpdateProfileRequest,
};
use crate::services::PatientAccountService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<(StatusCode, Json<PatientProfile>), AppError> {
    let profile = PatientAccountService::new(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = PatientAccountService::new(&state).login(request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn check_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let exists = PatientAccountService::new(&state)
        .username_exists(&username)
        .await?;
    Ok(Json(json!({ "exists": exists })))
}

#[axum::debug_handler]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let exists = PatientAccountService::new(&state).email_exists(&email).await?;
    Ok(Json(json!({ "exists": exists })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<PatientProfile>, AppError> {
    let profile = PatientAccountService::new(&state).get_profile(&auth).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<PatientProfile>, AppError> {
    let profile = PatientAccountService::new(&state)
        .update_profile(&auth, request)
        .await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    PatientAccountService::new(&state)
        .change_password(&auth, request)
        .await?;
    Ok(Json(json!({ "message": "password updated" })))
}

#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Value>, AppError> {
    PatientAccountService::new(&state).delete_account(&auth).await?;
    Ok(Json(json!({ "message": "account deleted" })))
}
