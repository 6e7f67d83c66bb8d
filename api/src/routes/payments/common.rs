use db::models::payment;
use realtime::format::mask_card;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i64,
    pub service_request_id: Option<i64>,
    pub reference_number: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Masked, `**** **** **** 1234`.
    pub card: Option<String>,
    pub gateway_reference: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<payment::Model> for PaymentResponse {
    fn from(p: payment::Model) -> Self {
        Self {
            id: p.id,
            service_request_id: p.service_request_id,
            reference_number: p.reference_number,
            amount_cents: p.amount_cents,
            currency: p.currency,
            card: p.card_last4.as_deref().map(mask_card),
            gateway_reference: p.gateway_reference,
            status: p.status.to_string(),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub payment_id: i64,
    pub path: String,
    /// `D0A` + 8 hex digits.
    pub signature: String,
    pub hash: String,
    pub generated_at: String,
    pub html: String,
}
