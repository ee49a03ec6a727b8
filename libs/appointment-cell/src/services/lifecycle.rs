use chrono::{NaiveDate, Utc};
use tracing::info;

use shared_database::store::{Appointment, AppointmentStatus, NewAppointment, StoreError};
use shared_models::auth::{AuthPayload, Role};
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{CreateAppointmentRequest, ListWindow};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct AppointmentService<'a> {
    state: &'a AppState,
}

impl<'a> AppointmentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Book a new appointment for the calling patient. The doctor's display
    /// name and specialty are denormalized onto the row at creation time.
    pub async fn create(
        &self,
        auth: &AuthPayload,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        auth.require_role(Role::Patient)?;

        let appointment_date = NaiveDate::parse_from_str(&request.appointment_date, DATE_FORMAT)
            .map_err(|_| {
                AppError::Validation(format!(
                    "appointment_date must be formatted as YYYY-MM-DD, got {:?}",
                    request.appointment_date
                ))
            })?;
        if request.appointment_time.trim().is_empty() {
            return Err(AppError::Validation(
                "appointment_time must not be empty".to_string(),
            ));
        }

        let doctor = self
            .state
            .store
            .get_doctor(&request.doctor_username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    AppError::NotFound(format!("doctor {} not found", request.doctor_username))
                }
                other => other.into(),
            })?;

        let appointment = self
            .state
            .store
            .create_appointment(NewAppointment {
                patient_username: auth.username.clone(),
                doctor_username: doctor.username,
                doctor_name: doctor.name,
                appointment_date,
                appointment_time: request.appointment_time,
                specialty: doctor.specialization,
                symptoms: request.symptoms,
            })
            .await?;

        info!(
            "patient {} booked appointment {} with doctor {}",
            auth.username, appointment.id, appointment.doctor_username
        );
        Ok(appointment)
    }

    pub async fn get(&self, auth: &AuthPayload, id: i64) -> Result<Appointment, AppError> {
        let appointment = self.fetch(id).await?;
        ensure_bound_party(auth, &appointment)?;
        Ok(appointment)
    }

    pub async fn list_for_patient(
        &self,
        auth: &AuthPayload,
        window: ListWindow,
    ) -> Result<Vec<Appointment>, AppError> {
        auth.require_role(Role::Patient)?;
        let appointments = self
            .state
            .store
            .list_patient_appointments(&auth.username)
            .await?;
        Ok(apply_window(appointments, window))
    }

    pub async fn list_for_doctor(
        &self,
        auth: &AuthPayload,
        window: ListWindow,
    ) -> Result<Vec<Appointment>, AppError> {
        auth.require_role(Role::Doctor)?;
        let appointments = self
            .state
            .store
            .list_doctor_appointments(&auth.username)
            .await?;
        Ok(apply_window(appointments, window))
    }

    /// Either bound party may move the appointment to any of the three
    /// states; there is no transition graph beyond the closed enum.
    pub async fn update_status(
        &self,
        auth: &AuthPayload,
        id: i64,
        status: &str,
    ) -> Result<Appointment, AppError> {
        let status: AppointmentStatus = status.parse().map_err(AppError::Validation)?;

        let appointment = self.fetch(id).await?;
        ensure_bound_party(auth, &appointment)?;

        let updated = self.state.store.update_appointment_status(id, status).await?;
        info!("{} set appointment {} to {}", auth.username, id, status);
        Ok(updated)
    }

    /// Consultation notes are written by the bound doctor only and replace
    /// any previous notes.
    pub async fn add_notes(
        &self,
        auth: &AuthPayload,
        id: i64,
        notes: &str,
    ) -> Result<Appointment, AppError> {
        let appointment = self.fetch(id).await?;
        if auth.role != Role::Doctor || auth.username != appointment.doctor_username {
            return Err(AppError::Unauthorized(
                "only the appointment's doctor can add notes".to_string(),
            ));
        }
        Ok(self.state.store.set_appointment_notes(id, notes).await?)
    }

    pub async fn delete(&self, auth: &AuthPayload, id: i64) -> Result<(), AppError> {
        let appointment = self.fetch(id).await?;
        if auth.role != Role::Patient || auth.username != appointment.patient_username {
            return Err(AppError::Unauthorized(
                "only the appointment's patient can delete it".to_string(),
            ));
        }
        self.state.store.delete_appointment(id).await?;
        info!("patient {} deleted appointment {}", auth.username, id);
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Appointment, AppError> {
        self.state
            .store
            .get_appointment(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(format!("appointment {id} not found")),
                other => other.into(),
            })
    }
}

fn ensure_bound_party(auth: &AuthPayload, appointment: &Appointment) -> Result<(), AppError> {
    let bound = match auth.role {
        Role::Patient => auth.username == appointment.patient_username,
        Role::Doctor => auth.username == appointment.doctor_username,
    };
    if bound {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "not a party to this appointment".to_string(),
        ))
    }
}

fn apply_window(appointments: Vec<Appointment>, window: ListWindow) -> Vec<Appointment> {
    let today = Utc::now().date_naive();
    appointments
        .into_iter()
        .filter(|a| match window {
            ListWindow::All => true,
            ListWindow::Today => {
                a.appointment_date == today && a.status == AppointmentStatus::Upcoming
            }
            ListWindow::Upcoming => {
                a.status == AppointmentStatus::Upcoming && a.appointment_date >= today
            }
            ListWindow::Completed => a.status == AppointmentStatus::Completed,
        })
        .collect()
}
