use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::email;
use util::state::AppState;

use super::common::{EmailResponse, UnreadCountResponse};
use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};

/// GET /emails?limit=50
pub async fn list_emails(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match email::Model::list_recent(app_state.db(), query.limit()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(EmailResponse::from).collect::<Vec<_>>(),
                "Emails retrieved",
            )),
        ),
        Err(e) => db_error(e, "Emails"),
    }
}

/// GET /email-unread-count
///
/// ```json
/// { "success": true, "data": { "count": 4 }, "message": "..." }
/// ```
pub async fn email_unread_count(State(app_state): State<AppState>) -> impl IntoResponse {
    match email::Model::count_unread(app_state.db()).await {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UnreadCountResponse { count },
                "Unread email count retrieved",
            )),
        ),
        Err(e) => db_error(e, "Unread email count"),
    }
}
