use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_database::store::Patient;

#[derive(Debug, Deserialize)]
pub struct RegisterPatientRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of a patient account. The password hash never leaves the
/// service layer.
#[derive(Debug, Serialize)]
pub struct PatientProfile {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub created_at: DateTime<Utc>,
}

impl From<Patient> for PatientProfile {
    fn from(patient: Patient) -> Self {
        Self {
            username: patient.username,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            age: patient.age,
            gender: patient.gender,
            created_at: patient.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub patient: PatientProfile,
}
