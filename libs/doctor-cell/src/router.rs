use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;

/// Routes mounted under `/doctors`. The directory listing shares the `/`
/// path with registration and account deletion; only the routes added
/// before the `route_layer` call require a bearer token.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/password", patch(handlers::change_password))
        .route("/", delete(handlers::delete_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route("/", post(handlers::register).get(handlers::list_doctors))
        .route("/login", post(handlers::login))
        .route("/check-username/{username}", get(handlers::check_username))
        .route("/check-email/{email}", get(handlers::check_email))
        .with_state(state)
}
