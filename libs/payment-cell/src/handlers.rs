use std::sync::Arc;

use axum::{extract::State, Json};

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{CreateOrderRequest, PaymentOrder, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::services::PaymentService;

#[axum::debug_handler]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<PaymentOrder>, AppError> {
    let order = PaymentService::new(&state).create_order(request)?;
    Ok(Json(order))
}

#[axum::debug_handler]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let response = PaymentService::new(&state).verify(request)?;
    Ok(Json(response))
}
