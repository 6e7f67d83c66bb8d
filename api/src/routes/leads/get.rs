use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::service_request;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};
use crate::routes::service_requests::common::ServiceRequestResponse;

/// GET /leads?limit=50
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match service_request::Model::list_recent(app_state.db(), query.limit()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter()
                    .map(ServiceRequestResponse::from)
                    .collect::<Vec<_>>(),
                "Leads retrieved",
            )),
        ),
        Err(e) => db_error(e, "Leads"),
    }
}
