//! Card payments as reported by the hosted gateway, and their receipts.

pub mod common;
pub mod get;
pub mod post;

use axum::{Router, routing::get};
use util::state::AppState;

use get::{get_payment, get_receipt, list_payments};
use post::create_payment;

/// - `GET /payments` → `list_payments`
/// - `POST /payments` → `create_payment`
/// - `GET /payments/{id}` → `get_payment`
/// - `GET /payments/{id}/receipt` → `get_receipt`
pub fn payments_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/{id}", get(get_payment))
        .route("/{id}/receipt", get(get_receipt))
}
