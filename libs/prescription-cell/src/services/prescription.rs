use tracing::{info, warn};

use shared_database::store::{
    Appointment, AppointmentStatus, NewPrescription, Prescription, StoreError,
};
use shared_models::auth::{AuthPayload, Role};
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{
    CreatePrescriptionRequest, CreatePrescriptionResponse, FeedbackRequest,
    UpdatePrescriptionRequest,
};

pub struct PrescriptionService<'a> {
    state: &'a AppState,
}

impl<'a> PrescriptionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Issue a prescription for an appointment. At most one prescription
    /// exists per appointment.
    ///
    /// Issuing also moves the parent appointment to `completed` as a second,
    /// separate write. If that write fails the prescription still stands;
    /// the failure is logged and reported through `appointment_completed`.
    pub async fn create(
        &self,
        auth: &AuthPayload,
        request: CreatePrescriptionRequest,
    ) -> Result<CreatePrescriptionResponse, AppError> {
        auth.require_role(Role::Doctor)?;
        if request.prescription_text.trim().is_empty() {
            return Err(AppError::Validation(
                "prescription_text must not be empty".to_string(),
            ));
        }

        let appointment = self.fetch_appointment(request.appointment_id).await?;
        if auth.username != appointment.doctor_username {
            return Err(AppError::Unauthorized(
                "only the appointment's doctor can issue a prescription".to_string(),
            ));
        }

        let prescription = self
            .state
            .store
            .create_prescription(NewPrescription {
                appointment_id: appointment.id,
                prescription_text: request.prescription_text,
                consultation_notes: request.consultation_notes,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict(format!(
                    "appointment {} already has a prescription",
                    appointment.id
                )),
                other => other.into(),
            })?;

        let appointment_completed = match self
            .state
            .store
            .update_appointment_status(appointment.id, AppointmentStatus::Completed)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "prescription {} saved but appointment {} could not be completed: {e}",
                    prescription.id, appointment.id
                );
                false
            }
        };

        info!(
            "doctor {} issued prescription {} for appointment {}",
            auth.username, prescription.id, appointment.id
        );
        Ok(CreatePrescriptionResponse {
            prescription,
            appointment_completed,
        })
    }

    pub async fn get(
        &self,
        auth: &AuthPayload,
        appointment_id: i64,
    ) -> Result<Prescription, AppError> {
        let appointment = self.fetch_appointment(appointment_id).await?;
        ensure_bound_party(auth, &appointment)?;
        self.fetch_prescription(appointment_id).await
    }

    pub async fn exists(&self, auth: &AuthPayload, appointment_id: i64) -> Result<bool, AppError> {
        let appointment = self.fetch_appointment(appointment_id).await?;
        ensure_bound_party(auth, &appointment)?;
        match self.state.store.get_prescription(appointment_id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn update(
        &self,
        auth: &AuthPayload,
        appointment_id: i64,
        request: UpdatePrescriptionRequest,
    ) -> Result<Prescription, AppError> {
        auth.require_role(Role::Doctor)?;
        if request.prescription_text.trim().is_empty() {
            return Err(AppError::Validation(
                "prescription_text must not be empty".to_string(),
            ));
        }

        let appointment = self.fetch_appointment(appointment_id).await?;
        if auth.username != appointment.doctor_username {
            return Err(AppError::Unauthorized(
                "only the appointment's doctor can update the prescription".to_string(),
            ));
        }

        let prescription = self
            .state
            .store
            .update_prescription(
                appointment_id,
                &request.prescription_text,
                request.consultation_notes,
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(format!(
                    "appointment {appointment_id} has no prescription"
                )),
                other => other.into(),
            })?;
        Ok(prescription)
    }

    /// Patient feedback on a fulfilled prescription. Rating is validated
    /// before anything is written.
    pub async fn feedback(
        &self,
        auth: &AuthPayload,
        appointment_id: i64,
        request: FeedbackRequest,
    ) -> Result<Prescription, AppError> {
        auth.require_role(Role::Patient)?;
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                request.rating
            )));
        }

        let appointment = self.fetch_appointment(appointment_id).await?;
        if auth.username != appointment.patient_username {
            return Err(AppError::Unauthorized(
                "only the appointment's patient can leave feedback".to_string(),
            ));
        }

        let prescription = self
            .state
            .store
            .set_prescription_feedback(appointment_id, request.rating, request.comment)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(format!(
                    "appointment {appointment_id} has no prescription"
                )),
                other => other.into(),
            })?;

        info!(
            "patient {} rated prescription for appointment {} with {}",
            auth.username, appointment_id, request.rating
        );
        Ok(prescription)
    }

    async fn fetch_appointment(&self, id: i64) -> Result<Appointment, AppError> {
        self.state
            .store
            .get_appointment(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(format!("appointment {id} not found")),
                other => other.into(),
            })
    }

    async fn fetch_prescription(&self, appointment_id: i64) -> Result<Prescription, AppError> {
        self.state
            .store
            .get_prescription(appointment_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(format!(
                    "appointment {appointment_id} has no prescription"
                )),
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
