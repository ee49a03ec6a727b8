use tracing::info;

use shared_database::store::{DoctorProfileUpdate, NewDoctor, StoreError};
use shared_models::auth::{AuthPayload, Role};
use shared_models::error::AppError;
use shared_utils::password::{hash_password, verify_password};
use shared_utils::state::AppState;

use crate::models::{
    ChangePasswordRequest, DoctorProfile, LoginRequest, LoginResponse, RegisterDoctorRequest,
    UpdateProfileRequest,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub struct DoctorAccountService<'a> {
    state: &'a AppState,
}

impl<'a> DoctorAccountService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn register(
        &self,
        request: RegisterDoctorRequest,
    ) -> Result<DoctorProfile, AppError> {
        validate_registration(&request)?;

        if self
            .state
            .store
            .doctor_username_exists(&request.username)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "username {} is already taken",
                request.username
            )));
        }
        if self.state.store.doctor_email_exists(&request.email).await? {
            return Err(AppError::Conflict(format!(
                "email {} is already registered",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let doctor = self
            .state
            .store
            .create_doctor(NewDoctor {
                username: request.username,
                name: request.name,
                email: request.email,
                phone: request.phone,
                gender: request.gender,
                specialization: request.specialization,
                qualification: request.qualification,
                experience: request.experience,
                password_hash,
            })
            .await?;

        info!("registered doctor {}", doctor.username);
        Ok(doctor.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let doctor = self
            .state
            .store
            .get_doctor(&request.username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()),
                other => other.into(),
            })?;

        let matches = verify_password(&request.password, &doctor.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !matches {
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let (access_token, payload) = self.state.tokens.create_token(
            &doctor.username,
            Role::Doctor,
            self.state.config.token_duration,
        )?;

        info!("doctor {} logged in", doctor.username);
        Ok(LoginResponse {
            access_token,
            expires_at: payload.expires_at,
            doctor: doctor.into(),
        })
    }

    pub async fn get_profile(&self, auth: &AuthPayload) -> Result<DoctorProfile, AppError> {
        auth.require_role(Role::Doctor)?;
        let doctor = self.state.store.get_doctor(&auth.username).await?;
        Ok(doctor.into())
    }

    pub async fn update_profile(
        &self,
        auth: &AuthPayload,
        request: UpdateProfileRequest,
    ) -> Result<DoctorProfile, AppError> {
        auth.require_role(Role::Doctor)?;
        let current = self.state.store.get_doctor(&auth.username).await?;

        if let Some(email) = &request.email {
            if *email != current.email && self.state.store.doctor_email_exists(email).await? {
                return Err(AppError::Conflict(format!(
                    "email {email} is already registered"
                )));
            }
        }

        let doctor = self
            .state
            .store
            .update_doctor_profile(
                &auth.username,
                DoctorProfileUpdate {
                    name: request.name,
                    email: request.email,
                    phone: request.phone,
                    gender: request.gender,
                    specialization: request.specialization,
                    qualification: request.qualification,
                    experience: request.experience,
                },
            )
            .await?;
        Ok(doctor.into())
    }

    pub async fn change_password(
        &self,
        auth: &AuthPayload,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        auth.require_role(Role::Doctor)?;
        if request.new_password.is_empty() {
            return Err(AppError::Validation("new password must not be empty".to_string()));
        }

        let doctor = self.state.store.get_doctor(&auth.username).await?;
        let matches = verify_password(&request.current_password, &doctor.password_hash)
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
            .update_doctor_password(&auth.username, &password_hash)
            .await?;
        info!("doctor {} changed password", auth.username);
        Ok(())
    }

    pub async fn delete_account(&self, auth: &AuthPayload) -> Result<(), AppError> {
        auth.require_role(Role::Doctor)?;
        self.state.store.delete_doctor(&auth.username).await?;
        info!("doctor {} deleted their account", auth.username);
        Ok(())
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.state.store.doctor_username_exists(username).await?)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.state.store.doctor_email_exists(email).await?)
    }
}

fn validate_registration(request: &RegisterDoctorRequest) -> Result<(), AppError> {
    for (field, value) in [
        ("username", &request.username),
        ("name", &request.name),
        ("email", &request.email),
        ("specialization", &request.specialization),
        ("password", &request.password),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} must not be empty")));
        }
    }
    if request.experience < 0 {
        return Err(AppError::Validation(
            "experience must not be negative".to_string(),
        ));
    }
    Ok(())
}
