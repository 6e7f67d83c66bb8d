use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::notification::NotificationKind;
use db::models::payment::{self, NewPayment, PaymentStatus};
use db::models::service_request::{self, ServiceRequestStatus};
use realtime::format::format_eur_cents;
use serde::Deserialize;
use std::str::FromStr;
use util::state::AppState;
use validator::{Validate, ValidationError};

use super::common::PaymentResponse;
use crate::response::ApiResponse;
use crate::routes::common::{db_error, format_validation_errors};
use crate::services::email::{EmailError, EmailService};
use crate::ws::emit;

fn default_currency() -> String {
    "EUR".to_string()
}

/// Exactly four ASCII digits; anything else would end up on the receipt.
fn validate_card_last4(value: &str) -> Result<(), ValidationError> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("card_last4")
            .with_message("Only the last 4 card digits may be stored".into()))
    }
}

/// Outcome reported by the card gateway.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub service_request_id: Option<i64>,
    pub reference_number: Option<String>,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: i64,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
    #[validate(custom(function = "validate_card_last4"))]
    pub card_last4: Option<String>,
    pub gateway_reference: Option<String>,
    pub status: String,
}

/// POST /payments
///
/// Records a gateway outcome. The reference comes from the body or, when
/// absent, from the linked service request.
///
/// Publishes on `paiements` and `dashboard`. When the payment is settled it
/// also marks the linked request `paid` (published on `demandes`), records a
/// "Nouveau paiement reçu" notification and emails the customer a
/// confirmation in the background.
///
/// ### Responses
/// - `201 Created` with the stored payment
/// - `400 Bad Request` (validation failure, unknown status, no reference)
/// - `404 Not Found` when `serviceRequestId` is unknown
/// - `500 Internal Server Error`
pub async fn create_payment(
    State(app_state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<PaymentResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let Ok(status) = PaymentStatus::from_str(req.status.trim()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid status '{}'", req.status))),
        );
    };

    let db = app_state.db();
    let ws = app_state.ws();

    let request = match req.service_request_id {
        Some(id) => match service_request::Model::find_by_id(db, id).await {
            Ok(Some(r)) => Some(r),
            Ok(None) => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error("Service request not found")),
                );
            }
            Err(e) => return db_error(e, "Service request"),
        },
        None => None,
    };

    let reference = req
        .reference_number
        .filter(|r| !r.trim().is_empty())
        .or_else(|| request.as_ref().map(|r| r.reference_number.clone()));
    let Some(reference_number) = reference else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "A reference number or service request is required",
            )),
        );
    };

    let created = payment::Model::create(
        db,
        NewPayment {
            service_request_id: request.as_ref().map(|r| r.id),
            reference_number,
            amount_cents: req.amount_cents,
            currency: req.currency.to_uppercase(),
            card_last4: req.card_last4,
            gateway_reference: req.gateway_reference,
            status,
        },
    )
    .await;
    let payment = match created {
        Ok(p) => p,
        Err(e) => return db_error(e, "Payment"),
    };
    tracing::info!(id = payment.id, reference = %payment.reference_number, %status, "payment recorded");

    emit::payment_recorded(ws, &payment).await;

    if status.is_settled() {
        if let Some(r) = &request {
            match service_request::Model::set_status(db, r.id, ServiceRequestStatus::Paid).await {
                Ok(updated) => emit::request_updated(ws, &updated).await,
                Err(e) => tracing::warn!(id = r.id, error = %e, "could not mark request paid"),
            }

            let to = r.email.clone();
            let reference = payment.reference_number.clone();
            let amount = payment.amount_cents;
            tokio::spawn(async move {
                match EmailService::send_payment_confirmation(&to, &reference, amount).await {
                    Ok(()) => {}
                    Err(EmailError::NotConfigured) => {
                        tracing::debug!(reference, "payment confirmation skipped: email not configured")
                    }
                    Err(e) => tracing::warn!(reference, error = %e, "payment confirmation email failed"),
                }
            });
        }

        emit::record_notification(
            ws,
            db,
            NotificationKind::Payment,
            "Nouveau paiement reçu",
            &format!(
                "Réf: {} - Montant: {}",
                payment.reference_number,
                format_eur_cents(payment.amount_cents)
            ),
        )
        .await;
    }

    emit::dashboard_changed(ws, db).await;

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            PaymentResponse::from(payment),
            "Payment recorded",
        )),
    )
}
