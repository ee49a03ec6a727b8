use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{
    appointment_routes, doctor_schedule_routes, patient_history_routes,
};
use chatbot_cell::router::chat_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use payment_cell::router::payment_routes;
use prescription_cell::router::prescription_routes;
use shared_utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "TeleCare API is running!" }))
        .nest(
            "/patients",
            patient_routes(state.clone())
                .nest("/appointments", patient_history_routes(state.clone())),
        )
        .nest(
            "/doctors",
            doctor_routes(state.clone())
                .nest("/appointments", doctor_schedule_routes(state.clone())),
        )
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()))
        .nest("/payments", payment_routes(state.clone()))
        .nest("/api", chat_routes(state))
}
