use serde::{Deserialize, Serialize};

use shared_database::store::Prescription;

#[derive(Debug, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub appointment_id: i64,
    pub prescription_text: String,
    pub consultation_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub prescription_text: String,
    pub consultation_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

/// Creation response. `appointment_completed` reports whether the parent
/// appointment was moved to `completed`; the prescription itself is
/// persisted either way.
#[derive(Debug, Serialize)]
pub struct CreatePrescriptionResponse {
    pub prescription: Prescription,
    pub appointment_completed: bool,
}
