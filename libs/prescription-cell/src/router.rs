use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;

/// Routes mounted under `/prescriptions`. All require a bearer token;
/// the service checks which party of the appointment is calling.
pub fn prescription_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create))
        .route(
            "/{appointment_id}",
            get(handlers::get).put(handlers::update),
        )
        .route("/{appointment_id}/exists", get(handlers::exists))
        .route("/{appointment_id}/feedback", post(handlers::feedback))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
