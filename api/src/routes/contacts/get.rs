use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::contact_message;
use util::state::AppState;

use super::common::ContactResponse;
use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};

/// GET /contacts?limit=50
pub async fn list_contacts(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match contact_message::Model::list_recent(app_state.db(), query.limit()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ContactResponse::from).collect::<Vec<_>>(),
                "Contact messages retrieved",
            )),
        ),
        Err(e) => db_error(e, "Contact messages"),
    }
}
