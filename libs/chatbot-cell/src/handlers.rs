use std::sync::Arc;

use axum::{extract::State, Json};

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{ChatRequest, ChatResponse};
use crate::services::ChatService;

#[axum::debug_handler]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = ChatService::new(&state).ask(request).await?;
    Ok(Json(response))
}
