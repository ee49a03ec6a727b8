//! PostgREST-backed `Store` implementation.
//!
//! `DATABASE_URL` points at a PostgREST endpoint exposing the `patients`,
//! `doctors`, `appointments` and `prescriptions` tables. Unique constraints
//! live in the database; a 409 from the endpoint surfaces as
//! `StoreError::Conflict`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};
use urlencoding::encode;

use shared_config::AppConfig;

use crate::store::{
    Appointment, AppointmentStatus, Doctor, DoctorProfileUpdate, NewAppointment, NewDoctor,
    NewPatient, NewPrescription, PageParams, Patient, PatientProfileUpdate, Prescription, Store,
    StoreError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PostgrestStore {
    client: Client,
    base_url: String,
}

impl PostgrestStore {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.database_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }
        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        representation: bool,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("storage request: {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(Self::headers(representation));
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("storage error ({}): {}", status, text);
            return Err(match status {
                StatusCode::NOT_FOUND => StoreError::NotFound,
                StatusCode::CONFLICT => StoreError::Conflict(text),
                _ => StoreError::Unavailable(format!("{status}: {text}")),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Fetch rows and require exactly one; an empty result is `NotFound`.
    async fn fetch_one<T>(&self, path: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.request(Method::GET, path, None, false).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(rows.remove(0))
    }

    async fn insert_one<T>(&self, path: &str, body: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.request(Method::POST, path, Some(body), true).await?;
        if rows.is_empty() {
            return Err(StoreError::Unavailable(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn patch_one<T>(&self, path: &str, body: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.request(Method::PATCH, path, Some(body), true).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(rows.remove(0))
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let rows: Vec<Value> = self.request(Method::GET, path, None, false).await?;
        Ok(!rows.is_empty())
    }

    fn timestamped(mut body: Value) -> Value {
        let now = Utc::now();
        if let Some(map) = body.as_object_mut() {
            map.insert("created_at".to_string(), json!(now));
            map.insert("updated_at".to_string(), json!(now));
        }
        body
    }

    fn touched(mut body: Value) -> Value {
        if let Some(map) = body.as_object_mut() {
            map.insert("updated_at".to_string(), json!(Utc::now()));
        }
        body
    }
}

#[async_trait]
impl Store for PostgrestStore {
    async fn create_patient(&self, new: NewPatient) -> Result<Patient, StoreError> {
        self.insert_one("/patients", Self::timestamped(json!(new)))
            .await
    }

    async fn get_patient(&self, username: &str) -> Result<Patient, StoreError> {
        self.fetch_one(&format!("/patients?username=eq.{}", encode(username)))
            .await
    }

    async fn patient_username_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.exists(&format!(
            "/patients?username=eq.{}&select=username",
            encode(username)
        ))
        .await
    }

    async fn patient_email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.exists(&format!(
            "/patients?email=eq.{}&select=username",
            encode(email)
        ))
        .await
    }

    async fn update_patient_profile(
        &self,
        username: &str,
        update: PatientProfileUpdate,
    ) -> Result<Patient, StoreError> {
        self.patch_one(
            &format!("/patients?username=eq.{}", encode(username)),
            Self::touched(json!(update)),
        )
        .await
    }

    async fn update_patient_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let _: Patient = self
            .patch_one(
                &format!("/patients?username=eq.{}", encode(username)),
                Self::touched(json!({ "password_hash": password_hash })),
            )
            .await?;
        Ok(())
    }

    async fn delete_patient(&self, username: &str) -> Result<(), StoreError> {
        let _: Vec<Value> = self
            .request(
                Method::DELETE,
                &format!("/patients?username=eq.{}", encode(username)),
                None,
                true,
            )
            .await?;
        Ok(())
    }

    async fn create_doctor(&self, new: NewDoctor) -> Result<Doctor, StoreError> {
        self.insert_one("/doctors", Self::timestamped(json!(new)))
            .await
    }

    async fn get_doctor(&self, username: &str) -> Result<Doctor, StoreError> {
        self.fetch_one(&format!("/doctors?username=eq.{}", encode(username)))
            .await
    }

    async fn doctor_username_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.exists(&format!(
            "/doctors?username=eq.{}&select=username",
            encode(username)
        ))
        .await
    }

    async fn doctor_email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.exists(&format!(
            "/doctors?email=eq.{}&select=username",
            encode(email)
        ))
        .await
    }

    async fn update_doctor_profile(
        &self,
        username: &str,
        update: DoctorProfileUpdate,
    ) -> Result<Doctor, StoreError> {
        self.patch_one(
            &format!("/doctors?username=eq.{}", encode(username)),
            Self::touched(json!(update)),
        )
        .await
    }

    async fn update_doctor_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let _: Doctor = self
            .patch_one(
                &format!("/doctors?username=eq.{}", encode(username)),
                Self::touched(json!({ "password_hash": password_hash })),
            )
            .await?;
        Ok(())
    }

    async fn delete_doctor(&self, username: &str) -> Result<(), StoreError> {
        let _: Vec<Value> = self
            .request(
                Method::DELETE,
                &format!("/doctors?username=eq.{}", encode(username)),
                None,
                true,
            )
            .await?;
        Ok(())
    }

    async fn list_doctors(
        &self,
        page: PageParams,
        specialty: Option<&str>,
    ) -> Result<Vec<Doctor>, StoreError> {
        let mut path = format!(
            "/doctors?order=username.asc&limit={}&offset={}",
            page.limit, page.offset
        );
        if let Some(specialty) = specialty {
            path.push_str(&format!("&specialization=eq.{}", encode(specialty)));
        }
        self.request(Method::GET, &path, None, false).await
    }

    async fn create_appointment(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut body = Self::timestamped(json!(new));
        if let Some(map) = body.as_object_mut() {
            map.insert(
                "status".to_string(),
                json!(AppointmentStatus::Upcoming),
            );
        }
        self.insert_one("/appointments", body).await
    }

    async fn get_appointment(&self, id: i64) -> Result<Appointment, StoreError> {
        self.fetch_one(&format!("/appointments?id=eq.{id}")).await
    }

    async fn list_patient_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.request(
            Method::GET,
            &format!(
                "/appointments?patient_username=eq.{}&order=id.asc",
                encode(username)
            ),
            None,
            false,
        )
        .await
    }

    async fn list_doctor_appointments(
        &self,
        username: &str,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.request(
            Method::GET,
            &format!(
                "/appointments?doctor_username=eq.{}&order=id.asc",
                encode(username)
            ),
            None,
            false,
        )
        .await
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        self.patch_one(
            &format!("/appointments?id=eq.{id}"),
            Self::touched(json!({ "status": status })),
        )
        .await
    }

    async fn set_appointment_notes(
        &self,
        id: i64,
        notes: &str,
    ) -> Result<Appointment, StoreError> {
        self.patch_one(
            &format!("/appointments?id=eq.{id}"),
            Self::touched(json!({ "notes": notes })),
        )
        .await
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), StoreError> {
        let rows: Vec<Value> = self
            .request(
                Method::DELETE,
                &format!("/appointments?id=eq.{id}"),
                None,
                true,
            )
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn create_prescription(
        &self,
        new: NewPrescription,
    ) -> Result<Prescription, StoreError> {
        self.insert_one("/prescriptions", Self::timestamped(json!(new)))
            .await
    }

    async fn get_prescription(&self, appointment_id: i64) -> Result<Prescription, StoreError> {
        self.fetch_one(&format!("/prescriptions?appointment_id=eq.{appointment_id}"))
            .await
    }

    async fn update_prescription(
        &self,
        appointment_id: i64,
        prescription_text: &str,
        consultation_notes: Option<String>,
    ) -> Result<Prescription, StoreError> {
        self.patch_one(
            &format!("/prescriptions?appointment_id=eq.{appointment_id}"),
            Self::touched(json!({
                "prescription_text": prescription_text,
                "consultation_notes": consultation_notes,
            })),
        )
        .await
    }

    async fn set_prescription_feedback(
        &self,
        appointment_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Prescription, StoreError> {
        self.patch_one(
            &format!("/prescriptions?appointment_id=eq.{appointment_id}"),
            Self::touched(json!({
                "feedback_rating": rating,
                "feedback_comment": comment,
            })),
        )
        .await
    }
}
