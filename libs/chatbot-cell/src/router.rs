use std::sync::Arc;

use axum::{routing::post, Router};

use shared_utils::state::AppState;

use crate::handlers;

/// Routes mounted under `/api`.
pub fn chat_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .with_state(state)
}
