use assert_matches::assert_matches;

use payment_cell::models::{CreateOrderRequest, VerifyPaymentRequest};
use payment_cell::services::PaymentService;
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, test_state};

#[tokio::test]
async fn create_order_converts_to_minor_units() {
    let state = test_state();
    let service = PaymentService::new(&state);

    let order = service.create_order(CreateOrderRequest { amount: 499.50 }).unwrap();
    assert_eq!(order.amount, 49950);
    assert_eq!(order.currency, "INR");
    assert_eq!(order.status, "created");
    assert!(order.order_id.starts_with("order_"));
    assert!(order.receipt.starts_with("order_rcptid_"));
    assert_eq!(order.order_id.len(), "order_".len() + 14);
    assert_eq!(order.receipt.len(), "order_rcptid_".len() + 10);
}

#[tokio::test]
async fn order_ids_are_unique() {
    let state = test_state();
    let service = PaymentService::new(&state);

    let first = service.create_order(CreateOrderRequest { amount: 100.0 }).unwrap();
    let second = service.create_order(CreateOrderRequest { amount: 100.0 }).unwrap();
    assert_ne!(first.order_id, second.order_id);
}

#[tokio::test]
async fn create_order_rejects_non_positive_amounts() {
    let state = test_state();
    let service = PaymentService::new(&state);

    assert_matches!(
        service.create_order(CreateOrderRequest { amount: 0.0 }),
        Err(AppError::Validation(_))
    );
    assert_matches!(
        service.create_order(CreateOrderRequest { amount: -10.0 }),
        Err(AppError::Validation(_))
    );
    assert_matches!(
        service.create_order(CreateOrderRequest { amount: f64::NAN }),
        Err(AppError::Validation(_))
    );
}

#[tokio::test]
async fn unconfigured_gateway_is_an_internal_error() {
    let mut config = test_config();
    config.payment_key_secret = String::new();
    let state = std::sync::Arc::new(
        shared_utils::state::AppState::new(
            config,
            std::sync::Arc::new(shared_database::memory::MemoryStore::new()),
        )
        .unwrap(),
    );
    let service = PaymentService::new(&state);

    assert_matches!(
        service.create_order(CreateOrderRequest { amount: 10.0 }),
        Err(AppError::Internal(_))
    );
    assert_matches!(
        service.verify(VerifyPaymentRequest {
            order_id: "order_1".to_string(),
            payment_id: "pay_1".to_string(),
            signature: "sig".to_string(),
        }),
        Err(AppError::Internal(_))
    );
}

#[tokio::test]
async fn mismatched_signature_is_a_failure_status_not_an_error() {
    let state = test_state();
    let service = PaymentService::new(&state);

    let response = service
        .verify(VerifyPaymentRequest {
            order_id: "order_1".to_string(),
            payment_id: "pay_1".to_string(),
            signature: "definitely-wrong".to_string(),
        })
        .unwrap();
    assert_eq!(response.status, "failure");
}
