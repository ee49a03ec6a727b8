use assert_matches::assert_matches;

use patient_cell::models::{
    ChangePasswordRequest, LoginRequest, RegisterPatientRequest, UpdateProfileRequest,
};
use patient_cell::services::PatientAccountService;
use shared_models::error::AppError;
use shared_utils::test_utils::{doctor_identity, patient_identity, test_state, TEST_PASSWORD};

fn register_request(username: &str, email: &str) -> RegisterPatientRequest {
    RegisterPatientRequest {
        username: username.to_string(),
        name: "Alice Smith".to_string(),
        email: email.to_string(),
        phone: "5550100".to_string(),
        age: 29,
        gender: "female".to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let state = test_state();
    let service = PatientAccountService::new(&state);

    let profile = service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(profile.username, "alice");

    let response = service
        .login(LoginRequest {
            username: "alice".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert!(!response.access_token.is_empty());
    assert_eq!(response.patient.email, "alice@example.com");

    let payload = state.tokens.verify_token(&response.access_token).unwrap();
    assert_eq!(payload.username, "alice");
}

#[tokio::test]
async fn duplicate_username_and_email_conflict() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    assert_matches!(
        service
            .register(register_request("alice", "other@example.com"))
            .await,
        Err(AppError::Conflict(_))
    );
    assert_matches!(
        service
            .register(register_request("alice2", "alice@example.com"))
            .await,
        Err(AppError::Conflict(_))
    );
}

#[tokio::test]
async fn register_rejects_empty_fields() {
    let state = test_state();
    let service = PatientAccountService::new(&state);

    let mut request = register_request("alice", "alice@example.com");
    request.username = "   ".to_string();
    assert_matches!(service.register(request).await, Err(AppError::Validation(_)));

    let mut request = register_request("alice", "alice@example.com");
    request.age = 0;
    assert_matches!(service.register(request).await, Err(AppError::Validation(_)));
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_indistinguishable() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    let unknown = service
        .login(LoginRequest {
            username: "nobody".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    let wrong = service
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();

    assert_matches!(&unknown, AppError::Unauthenticated(_));
    assert_matches!(&wrong, AppError::Unauthenticated(_));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn profile_requires_patient_role() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    assert_matches!(
        service.get_profile(&doctor_identity("alice")).await,
        Err(AppError::Unauthorized(_))
    );
    let profile = service.get_profile(&patient_identity("alice")).await.unwrap();
    assert_eq!(profile.name, "Alice Smith");
}

#[tokio::test]
async fn update_profile_changes_only_supplied_fields() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    let profile = service
        .update_profile(
            &patient_identity("alice"),
            UpdateProfileRequest {
                phone: Some("5550199".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.phone, "5550199");
    assert_eq!(profile.name, "Alice Smith");
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn update_profile_rejects_taken_email() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();
    service
        .register(register_request("bea", "bea@example.com"))
        .await
        .unwrap();

    assert_matches!(
        service
            .update_profile(
                &patient_identity("alice"),
                UpdateProfileRequest {
                    email: Some("bea@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(AppError::Conflict(_))
    );

    // Re-submitting the current email is a no-op, not a conflict.
    let profile = service
        .update_profile(
            &patient_identity("alice"),
            UpdateProfileRequest {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    assert_matches!(
        service
            .change_password(
                &patient_identity("alice"),
                ChangePasswordRequest {
                    current_password: "wrong".to_string(),
                    new_password: "brand-new".to_string(),
                },
            )
            .await,
        Err(AppError::Unauthenticated(_))
    );

    service
        .change_password(
            &patient_identity("alice"),
            ChangePasswordRequest {
                current_password: TEST_PASSWORD.to_string(),
                new_password: "brand-new".to_string(),
            },
        )
        .await
        .unwrap();

    assert_matches!(
        service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await,
        Err(AppError::Unauthenticated(_))
    );
    service
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "brand-new".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_account_then_login_fails() {
    let state = test_state();
    let service = PatientAccountService::new(&state);
    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    service.delete_account(&patient_identity("alice")).await.unwrap();
    assert_matches!(
        service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await,
        Err(AppError::Unauthenticated(_))
    );
}

#[tokio::test]
async fn existence_probes_report_registration() {
    let state = test_state();
    let service = PatientAccountService::new(&state);

    assert!(!service.username_exists("alice").await.unwrap());
    assert!(!service.email_exists("alice@example.com").await.unwrap());

    service
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    assert!(service.username_exists("alice").await.unwrap());
    assert!(service.email_exists("alice@example.com").await.unwrap());
}
