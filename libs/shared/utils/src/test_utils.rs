//! Shared fixtures for cell-level tests: a configured [`AppState`] backed by
//! the in-memory store plus identity and account seed helpers.

use std::sync::Arc;

use chrono::Duration;

use shared_config::AppConfig;
use shared_database::memory::MemoryStore;
use shared_database::store::{NewDoctor, NewPatient, Store};
use shared_models::auth::{AuthPayload, Role};

use crate::password::hash_password;
use crate::state::AppState;

pub const TEST_SYMMETRIC_KEY: &str = "0123456789abcdef0123456789abcdef";
pub const TEST_PASSWORD: &str = "correct-horse";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "http://localhost:54321".to_string(),
        token_symmetric_key: TEST_SYMMETRIC_KEY.to_string(),
        token_duration: Duration::minutes(60),
        listen_address: "127.0.0.1:0".to_string(),
        payment_key_id: "test_key_id".to_string(),
        payment_key_secret: "test_key_secret".to_string(),
        chat_api_url: "http://localhost:54321/chat".to_string(),
        chat_api_key: "test-chat-key".to_string(),
    }
}

pub fn test_state() -> Arc<AppState> {
    test_state_with(Arc::new(MemoryStore::new()))
}

pub fn test_state_with(store: Arc<dyn Store>) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), store).expect("test symmetric key is 32 bytes"))
}

pub fn patient_identity(username: &str) -> AuthPayload {
    AuthPayload::new(username, Role::Patient, Duration::minutes(60))
}

pub fn doctor_identity(username: &str) -> AuthPayload {
    AuthPayload::new(username, Role::Doctor, Duration::minutes(60))
}

pub async fn seed_patient(store: &dyn Store, username: &str) {
    store
        .create_patient(NewPatient {
            username: username.to_string(),
            name: format!("{username} patient"),
            email: format!("{username}@patients.example.com"),
            phone: "5550100".to_string(),
            age: 34,
            gender: "female".to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        })
        .await
        .expect("seed patient");
}

pub async fn seed_doctor(store: &dyn Store, username: &str, specialization: &str) {
    store
        .create_doctor(NewDoctor {
            username: username.to_string(),
            name: format!("Dr. {username}"),
            email: format!("{username}@doctors.example.com"),
            phone: "5550200".to_string(),
            gender: "male".to_string(),
            specialization: specialization.to_string(),
            qualification: "MBBS".to_string(),
            experience: 8,
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
        })
        .await
        .expect("seed doctor");
}
