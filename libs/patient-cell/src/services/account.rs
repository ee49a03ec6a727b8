use tracing::info;

use shared_database::store::{NewPatient, PatientProfileUpdate, StoreError};
use shared_models::auth::{AuthPayload, Role};
use shared_models::error::AppError;
use shared_utils::password::{hash_password, verify_password};
use shared_utils::state::AppState;

use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PatientProfile, RegisterPatientRequest,
    UpdateProfileRequest,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub struct PatientAccountService<'a> {
    state: &'a AppState,
}

impl<'a> PatientAccountService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn register(
        &self,
        request: RegisterPatientRequest,
    ) -> Result<PatientProfile, AppError> {
        validate_registration(&request)?;

        if self
            .state
            .store
            .patient_username_exists(&request.username)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "username {} is already taken",
                request.username
            )));
        }
        if self.state.store.patient_email_exists(&request.email).await? {
            return Err(AppError::Conflict(format!(
                "email {} is already registered",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let patient = self
            .state
            .store
            .create_patient(NewPatient {
                username: request.username,
                name: request.name,
                email: request.email,
                phone: request.phone,
                age: request.age,
                gender: request.gender,
                password_hash,
            })
            .await?;

        info!("registered patient {}", patient.username);
        Ok(patient.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        // An unknown username and a wrong password must be indistinguishable
        // to the caller.
        let patient = self
            .state
            .store
            .get_patient(&request.username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()),
                other => other.into(),
            })?;

        let matches = verify_password(&request.password, &patient.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !matches {
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let (access_token, payload) = self.state.tokens.create_token(
            &patient.username,
            Role::Patient,
            self.state.config.token_duration,
        )?;

        info!("patient {} logged in", patient.username);
        Ok(LoginResponse {
            access_token,
            expires_at: payload.expires_at,
            patient: patient.into(),
        })
    }

    pub async fn get_profile(&self, auth: &AuthPayload) -> Result<PatientProfile, AppError> {
        auth.require_role(Role::Patient)?;
        let patient = self.state.store.get_patient(&auth.username).await?;
        Ok(patient.into())
    }

    pub async fn update_profile(
        &self,
        auth: &AuthPayload,
        request: UpdateProfileRequest,
    ) -> Result<PatientProfile, AppError> {
        auth.require_role(Role::Patient)?;
        let current = self.state.store.get_patient(&auth.username).await?;

        if let Some(email) = &request.email {
            if *email != current.email && self.state.store.patient_email_exists(email).await? {
                return Err(AppError::Conflict(format!(
                    "email {email} is already registered"
                )));
            }
        }

        let patient = self
            .state
            .store
            .update_patient_profile(
                &auth.username,
                PatientProfileUpdate {
                    name: request.name,
                    email: request.email,
                    phone: request.phone,
                    age: request.age,
                    gender: request.gender,
                },
            )
            .await?;
        Ok(patient.into())
    }

    pub async fn change_password(
        &self,
        auth: &AuthPayload,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        auth.require_role(Role::Patient)?;
        if request.new_password.is_empty() {
            return Err(AppError::Validation("new password must not be empty".to_string()));
        }

        let patient = self.state.store.get_patient(&auth.username).await?;
        let matches = verify_password(&request.current_password, &patient.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !matches {
            return Err(AppError::Unauthenticated(
                "current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
        self.state
            .store
            .update_patient_password(&auth.username, &password_hash)
            .await?;
        info!("patient {} changed password", auth.username);
        Ok(())
    }

    pub async fn delete_account(&self, auth: &AuthPayload) -> Result<(), AppError> {
        auth.require_role(Role::Patient)?;
        self.state.store.delete_patient(&auth.username).await?;
        info!("patient {} deleted their account", auth.username);
        Ok(())
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.state.store.patient_username_exists(username).await?)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.state.store.patient_email_exists(email).await?)
    }
}

fn validate_registration(request: &RegisterPatientRequest) -> Result<(), AppError> {
    for (field, value) in [
        ("username", &request.username),
        ("name", &request.name),
        ("email", &request.email),
        ("password", &request.password),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} must not be empty")));
        }
    }
    if request.age <= 0 {
        return Err(AppError::Validation("age must be positive".to_string()));
    }
    Ok(())
}
