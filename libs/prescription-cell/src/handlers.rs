use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::store::Prescription;
use shared_models::auth::AuthPayload;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{
    CreatePrescriptionRequest, CreatePrescriptionResponse, FeedbackRequest,
    UpdatePrescriptionRequest,
};
use crate::services::PrescriptionService;

#[axum::debug_handler]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<CreatePrescriptionResponse>), AppError> {
    let response = PrescriptionService::new(&state).create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Prescription>, AppError> {
    let prescription = PrescriptionService::new(&state)
        .get(&auth, appointment_id)
        .await?;
    Ok(Json(prescription))
}

#[axum::debug_handler]
pub async fn exists(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let exists = PrescriptionService::new(&state)
        .exists(&auth, appointment_id)
        .await?;
    Ok(Json(json!({ "exists": exists })))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Prescription>, AppError> {
    let prescription = PrescriptionService::new(&state)
        .update(&auth, appointment_id, request)
        .await?;
    Ok(Json(prescription))
}

#[axum::debug_handler]
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<Prescription>, AppError> {
    let prescription = PrescriptionService::new(&state)
        .feedback(&auth, appointment_id, request)
        .await?;
    Ok(Json(prescription))
}
