use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage-level failures. The storage collaborator is the single place
/// where uniqueness races are resolved; a check-then-insert losing the race
/// still comes back as `Conflict`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Default mapping into the API error taxonomy. Operations that need a
/// different mapping (login, uniqueness pre-checks) use `map_err` at the
/// call site instead.
impl From<StoreError> for shared_models::error::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("record not found".to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Unavailable(msg) => Self::Internal(msg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Upcoming => write!(f, "upcoming"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPatient {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub password_hash: String,
}

/// Partial profile update; only supplied fields are changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub specialization: String,
    pub qualification: String,
    pub experience: i32,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub specialization: String,
    pub qualification: String,
    pub experience: i32,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DoctorProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub limit: i32,
    pub offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_username: String,
    pub doctor_username: String,
    pub doctor_name: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub specialty: String,
    pub symptoms: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub patient_username: String,
    pub doctor_username: String,
    pub doctor_name: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub specialty: String,
    pub symptoms: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub appointment_id: i64,
    pub prescription_text: String,
    pub consultation_notes: Option<String>,
    pub feedback_rating: Option<i32>,
    pub feedback_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPrescription {
    pub appointment_id: i64,
    pub prescription_text: String,
    pub consultation_notes: Option<String>,
}

/// Abstract data-access capability. Services depend on this trait only;
/// the concrete backend is injected at process start.
///
/// Single-record reads and writes are atomic; no cross-record transaction
/// is offered and none is assumed by callers.
#[async_trait]
pub trait Store: Send + Sync {
    // Patients
    async fn create_patient(&self, new: NewPatient) -> Result<Patient, StoreError>;
    async fn get_patient(&self, username: &str) -> Result<Patient, StoreError>;
    async fn patient_username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn patient_email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn update_patient_profile(
        &self,
        username: &str,
        update: PatientProfileUpdate,
    ) -> Result<Patient, StoreError>;
    async fn update_patient_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError>;
    async fn delete_patient(&self, username: &str) -> Result<(), StoreError>;

    // Doctors
    async fn create_doctor(&self, new: NewDoctor) -> Result<Doctor, StoreError>;
    async fn get_doctor(&self, username: &str) -> Result<Doctor, StoreError>;
    async fn doctor_username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn doctor_email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn update_doctor_profile(
        &self,
        username: &str,
        update: DoctorProfileUpdate,
    ) -> Result<Doctor, StoreError>;
    async fn update_doctor_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError>;
    async fn delete_doctor(&self, username: &str) -> Result<(), StoreError>;
    async fn list_doctors(
        &self,
        page: PageParams,
        specialty: Option<&str>,
    ) -> Result<Vec<Doctor>, StoreError>;

    // Appointments; new rows always start out `upcoming`
    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError>;
    async fn get_appointment(&self, id: i64) -> Result<Appointment, StoreError>;
    async fn list_patient_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError>;
    async fn list_doctor_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError>;
    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;
    async fn set_appointment_notes(&self, id: i64, notes: &str)
        -> Result<Appointment, StoreError>;
    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError>;

    // Prescriptions, keyed by the owning appointment (at most one each)
    async fn create_prescription(
        &self,
        new: NewPrescription,
    ) -> Result<Prescription, StoreError>;
    async fn get_prescription(&self, appointment_id: i64) -> Result<Prescription, StoreError>;
    async fn update_prescription(
        &self,
        appointment_id: i64,
        prescription_text: &str,
        consultation_notes: Option<String>,
    ) -> Result<Prescription, StoreError>;
    async fn set_prescription_feedback(
        &self,
        appointment_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Prescription, StoreError>;
}
