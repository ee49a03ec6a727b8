use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in whole currency units, e.g. rupees.
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct PaymentOrder {
    pub order_id: String,
    /// Minor currency units (amount x 100).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub status: String,
}
