//! Payment confirmation is a best-effort side protocol: nothing in the
//! appointment or prescription flow waits on it or reads its outcome.

use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::Sha256;
use tracing::info;

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{CreateOrderRequest, PaymentOrder, VerifyPaymentRequest, VerifyPaymentResponse};

type HmacSha256 = Hmac<Sha256>;

const CURRENCY: &str = "INR";

pub struct PaymentService<'a> {
    state: &'a AppState,
}

impl<'a> PaymentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a local payment order. Amounts are converted to minor units
    /// (x100) as the gateway expects.
    pub fn create_order(&self, request: CreateOrderRequest) -> Result<PaymentOrder, AppError> {
        if !self.state.config.is_payment_configured() {
            return Err(AppError::Internal(
                "payment gateway is not configured".to_string(),
            ));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::Validation(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }

        let order = PaymentOrder {
            order_id: format!("order_{}", random_alphanumeric(14)),
            amount: (request.amount * 100.0).round() as i64,
            currency: CURRENCY.to_string(),
            receipt: format!("order_rcptid_{}", random_alphanumeric(10)),
            status: "created".to_string(),
            created_at: Utc::now(),
        };
        info!("created payment order {} for {} paise", order.order_id, order.amount);
        Ok(order)
    }

    /// Check the gateway callback signature. A mismatch is a `failure`
    /// status in the response, not an error.
    pub fn verify(&self, request: VerifyPaymentRequest) -> Result<VerifyPaymentResponse, AppError> {
        if !self.state.config.is_payment_configured() {
            return Err(AppError::Internal(
                "payment gateway is not configured".to_string(),
            ));
        }

        let valid = verify_signature(
            &self.state.config.payment_key_secret,
            &request.order_id,
            &request.payment_id,
            &request.signature,
        );
        let status = if valid { "success" } else { "failure" };
        info!("payment {} verification: {}", request.payment_id, status);
        Ok(VerifyPaymentResponse {
            status: status.to_string(),
        })
    }
}

/// Expected signature is `hex(HMAC-SHA256(secret, "{order_id}|{payment_id}"))`.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn random_alphanumeric(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
