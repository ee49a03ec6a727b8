use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;

/// Core lifecycle routes, mounted under `/appointments`. Everything here
/// requires a bearer token; per-row party checks happen in the service.
pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create))
        .route("/{id}", get(handlers::get).delete(handlers::delete))
        .route("/{id}/status", patch(handlers::update_status))
        .route("/{id}/notes", patch(handlers::add_notes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Patient-side history views, mounted under `/patients/appointments`.
pub fn patient_history_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::patient_all))
        .route("/today", get(handlers::patient_today))
        .route("/upcoming", get(handlers::patient_upcoming))
        .route("/completed", get(handlers::patient_completed))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Doctor-side schedule views, mounted under `/doctors/appointments`.
pub fn doctor_schedule_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::doctor_all))
        .route("/today", get(handlers::doctor_today))
        .route("/upcoming", get(handlers::doctor_upcoming))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
