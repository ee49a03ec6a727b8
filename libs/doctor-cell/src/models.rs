use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_database::store::Doctor;

#[derive(Debug, Deserialize)]
pub struct RegisterDoctorRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub specialization: String,
    pub qualification: String,
    pub experience: i32,
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
    pub gender: Option<String>,
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public directory query. `page_id` starts at 1.
#[derive(Debug, Default, Deserialize)]
pub struct ListDoctorsQuery {
    pub page_id: Option<i32>,
    pub page_size: Option<i32>,
    pub specialty: Option<String>,
}

/// Public view of a doctor account, also used for directory listings.
#[derive(Debug, Serialize)]
pub struct DoctorProfile {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub specialization: String,
    pub qualification: String,
    pub experience: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Doctor> for DoctorProfile {
    fn from(doctor: Doctor) -> Self {
        Self {
            username: doctor.username,
            name: doctor.name,
            email: doctor.email,
            phone: doctor.phone,
            gender: doctor.gender,
            specialization: doctor.specialization,
            qualification: doctor.qualification,
            experience: doctor.experience,
            created_at: doctor.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub doctor: DoctorProfile,
}
