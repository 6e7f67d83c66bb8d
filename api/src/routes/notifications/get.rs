use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::notification;
use util::state::AppState;

use super::common::{NotificationResponse, UnreadNotificationsResponse};
use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};

/// GET /notifications?limit=50
pub async fn list_notifications(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match notification::Model::list_recent(app_state.db(), query.limit()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter()
                    .map(NotificationResponse::from)
                    .collect::<Vec<_>>(),
                "Notifications retrieved",
            )),
        ),
        Err(e) => db_error(e, "Notifications"),
    }
}

/// GET /notifications/unread
///
/// Seed for the client's unread list, newest first.
pub async fn list_unread(State(app_state): State<AppState>) -> impl IntoResponse {
    match notification::Model::find_unread(app_state.db()).await {
        Ok(rows) => {
            let notifications: Vec<NotificationResponse> =
                rows.into_iter().map(NotificationResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    UnreadNotificationsResponse {
                        count: notifications.len(),
                        notifications,
                    },
                    "Unread notifications retrieved",
                )),
            )
        }
        Err(e) => db_error(e, "Unread notifications"),
    }
}
