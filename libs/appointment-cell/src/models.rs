use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_username: String,
    /// Calendar date as `YYYY-MM-DD`; parsed and validated in the service.
    pub appointment_date: String,
    pub appointment_time: String,
    pub symptoms: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AddNotesRequest {
    pub notes: String,
}

/// Listing window, always applied on top of the caller's own rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWindow {
    All,
    Today,
    Upcoming,
    Completed,
}
