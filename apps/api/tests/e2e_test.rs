//! Full booking scenario run through the assembled router, in process.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_utils::test_utils::test_state;
use telecare_api::router::create_router;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

#[tokio::test]
async fn alice_books_bob_end_to_end() {
    let state = test_state();
    let app = create_router(state);

    // Register a patient and a doctor.
    let (status, _) = send(
        &app,
        Method::POST,
        "/patients",
        None,
        Some(json!({
            "username": "alice",
            "name": "Alice Smith",
            "email": "alice@example.com",
            "phone": "5550100",
            "age": 29,
            "gender": "female",
            "password": "alices-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/doctors",
        None,
        Some(json!({
            "username": "bob",
            "name": "Dr. Bob Lee",
            "email": "bob@example.com",
            "phone": "5550200",
            "gender": "male",
            "specialization": "cardiology",
            "qualification": "MD",
            "experience": 12,
            "password": "bobs-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Duplicate patient username is rejected with a 400.
    let (status, body) = send(
        &app,
        Method::POST,
        "/patients",
        None,
        Some(json!({
            "username": "alice",
            "name": "Impostor",
            "email": "impostor@example.com",
            "phone": "5550666",
            "age": 40,
            "gender": "other",
            "password": "whatever"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "conflict");

    // Log both in.
    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/login",
        None,
        Some(json!({"username": "alice", "password": "alices-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice_token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/doctors/login",
        None,
        Some(json!({"username": "bob", "password": "bobs-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bob_token = body["access_token"].as_str().unwrap().to_string();

    // The doctor directory is public.
    let (status, body) = send(&app, Method::GET, "/doctors?specialty=cardiology", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "bob");

    // Booking without a token is rejected.
    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments",
        None,
        Some(json!({
            "doctor_username": "bob",
            "appointment_date": "2026-09-14",
            "appointment_time": "10:30",
            "symptoms": "chest pain on exertion"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");

    // Alice books Bob.
    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments",
        Some(&alice_token),
        Some(json!({
            "doctor_username": "bob",
            "appointment_date": "2026-09-14",
            "appointment_time": "10:30",
            "symptoms": "chest pain on exertion"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let appointment_id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "upcoming");
    assert_eq!(body["doctor_name"], "Dr. Bob Lee");
    assert_eq!(body["specialty"], "cardiology");

    // Both parties can read it; a doctor role token is required for the
    // doctor-side listing.
    let uri = format!("/appointments/{appointment_id}");
    let (status, _) = send(&app, Method::GET, &uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/patients/appointments", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/doctors/appointments", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/doctors/appointments", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");

    // Only the bound doctor writes notes.
    let uri = format!("/appointments/{appointment_id}/notes");
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&alice_token),
        Some(json!({"notes": "self diagnosis"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&bob_token),
        Some(json!({"notes": "ECG recommended"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notes"], "ECG recommended");

    // Bob issues a prescription, which completes the appointment.
    let (status, body) = send(
        &app,
        Method::POST,
        "/prescriptions",
        Some(&bob_token),
        Some(json!({
            "appointment_id": appointment_id,
            "prescription_text": "atorvastatin 10mg nightly",
            "consultation_notes": "review in one month"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["appointment_completed"], true);

    let uri = format!("/appointments/{appointment_id}");
    let (_, body) = send(&app, Method::GET, &uri, Some(&alice_token), None).await;
    assert_eq!(body["status"], "completed");

    let (status, body) = send(
        &app,
        Method::GET,
        "/patients/appointments/completed",
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Second prescription for the same appointment conflicts.
    let (status, body) = send(
        &app,
        Method::POST,
        "/prescriptions",
        Some(&bob_token),
        Some(json!({
            "appointment_id": appointment_id,
            "prescription_text": "duplicate",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "conflict");

    // Alice checks and reads the prescription, then leaves feedback.
    let uri = format!("/prescriptions/{appointment_id}/exists");
    let (status, body) = send(&app, Method::GET, &uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);

    let uri = format!("/prescriptions/{appointment_id}/feedback");
    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(&alice_token),
        Some(json!({"rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(&alice_token),
        Some(json!({"rating": 5, "comment": "clear and helpful"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback_rating"], 5);

    // Alice cancels the visit. Only she can; afterwards it is gone for
    // both parties.
    let uri = format!("/appointments/{appointment_id}");
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, body) = send(&app, Method::GET, "/doctors/appointments", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // A garbage token never gets past the middleware.
    let (status, body) = send(
        &app,
        Method::GET,
        "/patients/profile",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
}

#[tokio::test]
async fn pagination_bounds_are_enforced_at_the_http_surface() {
    let state = test_state();
    let app = create_router(state);

    let (status, body) = send(&app, Method::GET, "/doctors?page_id=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, body) = send(&app, Method::GET, "/doctors?page_size=50", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, body) = send(&app, Method::GET, "/doctors", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn payment_order_and_verification_flow() {
    let state = test_state();
    let app = create_router(state);

    let (status, body) = send(
        &app,
        Method::POST,
        "/payments/create-order",
        None,
        Some(json!({"amount": 750.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 75000);
    assert_eq!(body["currency"], "INR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/payments/verify",
        None,
        Some(json!({
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": "bogus"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failure");
}
