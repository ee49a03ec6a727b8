use std::sync::Arc;

use axum::{routing::post, Router};

use shared_utils::state::AppState;

use crate::handlers;

/// Routes mounted under `/payments`.
pub fn payment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/create-order", post(handlers::create_order))
        .route("/verify", post(handlers::verify))
        .with_state(state)
}
