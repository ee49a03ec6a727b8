use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthPayload;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{
    ChangePasswordRequest, DoctorProfile, ListDoctorsQuery, LoginRequest, LoginResponse,
    RegisterDoctorRequest, UpdateProfileRequest,
};
use crate::services::{DoctorAccountService, DoctorDirectoryService};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<(StatusCode, Json<DoctorProfile>), AppError> {
    let profile = DoctorAccountService::new(&state).register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = DoctorAccountService::new(&state).login(request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDoctorsQuery>,
) -> Result<Json<Vec<DoctorProfile>>, AppError> {
    let doctors = DoctorDirectoryService::new(&state).list(query).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn check_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    let exists = DoctorAccountService::new(&state)
        .username_exists(&username)
        .await?;
    Ok(Json(json!({ "exists": exists })))
}

#[axum::debug_handler]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let exists = DoctorAccountService::new(&state).email_exists(&email).await?;
    Ok(Json(json!({ "exists": exists })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<DoctorProfile>, AppError> {
    let profile = DoctorAccountService::new(&state).get_profile(&auth).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<DoctorProfile>, AppError> {
    let profile = DoctorAccountService::new(&state)
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
    DoctorAccountService::new(&state)
        .change_password(&auth, request)
        .await?;
    Ok(Json(json!({ "message": "password updated" })))
}

#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Value>, AppError> {
    DoctorAccountService::new(&state).delete_account(&auth).await?;
    Ok(Json(json!({ "message": "account deleted" })))
}
