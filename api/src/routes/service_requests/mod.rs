//! Back-office view of connection requests ("demandes").

pub mod common;
pub mod get;
pub mod put;

use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

use get::{get_service_request, list_service_requests};
use put::update_status;

/// - `GET /service-requests` → `list_service_requests`
/// - `GET /service-requests/{id}` → `get_service_request`
/// - `PUT /service-requests/{id}/status` → `update_status`
pub fn service_requests_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_service_requests))
        .route("/{id}", get(get_service_request))
        .route("/{id}/status", put(update_status))
}
