use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::service_request::{self, ServiceRequestStatus};
use serde::Deserialize;
use std::str::FromStr;
use util::state::AppState;

use super::common::ServiceRequestResponse;
use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::ws::emit;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /service-requests/{id}/status
///
/// ### Request Body
/// ```json
/// { "status": "in_progress" }
/// ```
///
/// Publishes the updated request on `demandes` and fresh stats on
/// `dashboard`.
///
/// ### Responses
/// - `200 OK` with the updated request
/// - `400 Bad Request` for an unknown status
/// - `404 Not Found`
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Ok(status) = ServiceRequestStatus::from_str(req.status.trim()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ServiceRequestResponse>::error(format!(
                "Invalid status '{}'",
                req.status
            ))),
        );
    };

    let db = app_state.db();
    match service_request::Model::set_status(db, id, status).await {
        Ok(updated) => {
            emit::request_updated(app_state.ws(), &updated).await;
            emit::dashboard_changed(app_state.ws(), db).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ServiceRequestResponse::from(updated),
                    "Status updated",
                )),
            )
        }
        Err(e) => db_error(e, "Service request"),
    }
}
