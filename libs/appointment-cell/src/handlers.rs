use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::store::Appointment;
use shared_models::auth::AuthPayload;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{AddNotesRequest, CreateAppointmentRequest, ListWindow, UpdateStatusRequest};
use crate::services::AppointmentService;

#[axum::debug_handler]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = AppointmentService::new(&state).create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&state).get(&auth, id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&state)
        .update_status(&auth, id, &request.status)
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn add_notes(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(id): Path<i64>,
    Json(request): Json<AddNotesRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&state)
        .add_notes(&auth, id, &request.notes)
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    AppointmentService::new(&state).delete(&auth, id).await?;
    Ok(Json(json!({ "message": "appointment deleted" })))
}

#[axum::debug_handler]
pub async fn patient_all(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_patient(&auth, ListWindow::All)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn patient_today(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_patient(&auth, ListWindow::Today)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn patient_upcoming(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_patient(&auth, ListWindow::Upcoming)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn patient_completed(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_patient(&auth, ListWindow::Completed)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn doctor_all(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_doctor(&auth, ListWindow::All)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn doctor_today(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_doctor(&auth, ListWindow::Today)
        .await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn doctor_upcoming(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthPayload>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&state)
        .list_for_doctor(&auth, ListWindow::Upcoming)
        .await?;
    Ok(Json(appointments))
}
