use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::notification;
use util::state::AppState;

use super::common::NotificationResponse;
use crate::response::ApiResponse;
use crate::routes::common::db_error;
use crate::ws::emit;

/// POST /notifications/{id}/mark-read
///
/// Idempotent. Publishes fresh stats on `dashboard`; nothing is published on
/// `notifications`, which only carries new items.
///
/// ### Responses
/// - `200 OK` with the notification
/// - `404 Not Found`
pub async fn mark_read(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match notification::Model::mark_read(app_state.db(), id).await {
        Ok(n) => {
            emit::dashboard_changed(app_state.ws(), app_state.db()).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    NotificationResponse::from(n),
                    "Notification marked as read",
                )),
            )
        }
        Err(e) => db_error(e, "Notification"),
    }
}
