use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::payment;
use sea_orm::DbErr;
use services::receipt::ReceiptService;
use util::{paths::certificates_dir, state::AppState};

use super::common::{PaymentResponse, ReceiptResponse};
use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};

/// GET /payments?limit=50
pub async fn list_payments(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match payment::Model::list_recent(app_state.db(), query.limit()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(PaymentResponse::from).collect::<Vec<_>>(),
                "Payments retrieved",
            )),
        ),
        Err(e) => db_error(e, "Payments"),
    }
}

/// GET /payments/{id}
pub async fn get_payment(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let found = payment::Model::find_by_id(app_state.db(), id)
        .await
        .and_then(|m| m.ok_or_else(|| DbErr::RecordNotFound(id.to_string())));

    match found {
        Ok(p) => (
            StatusCode::OK,
            Json(ApiResponse::success(PaymentResponse::from(p), "Payment retrieved")),
        ),
        Err(e) => db_error(e, "Payment"),
    }
}

/// GET /payments/{id}/receipt
///
/// Generates `receipt_<id>.html` under `CERTIFICATES_DIR` and returns its
/// location, signature and markup.
///
/// ### Responses
/// - `200 OK` with `{ paymentId, path, signature, hash, generatedAt, html }`
/// - `500 Internal Server Error` with the reason on any generation failure,
///   including an unknown or unpaid payment
pub async fn get_receipt(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match ReceiptService::generate(app_state.db(), id, &certificates_dir()).await {
        Ok(doc) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ReceiptResponse {
                    payment_id: doc.payment_id,
                    path: doc.path.display().to_string(),
                    signature: doc.signature.code,
                    hash: doc.signature.hash,
                    generated_at: doc.generated_at.to_rfc3339(),
                    html: doc.html,
                },
                "Receipt generated",
            )),
        ),
        Err(e) => {
            tracing::error!(payment_id = id, error = %e, "receipt generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ReceiptResponse>::error(e.to_string())),
            )
        }
    }
}
