use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::service_request;
use sea_orm::DbErr;
use util::state::AppState;

use super::common::ServiceRequestResponse;
use crate::response::ApiResponse;
use crate::routes::common::{ListQuery, db_error};

/// GET /service-requests?limit=50
///
/// Most recent first.
pub async fn list_service_requests(
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
                "Service requests retrieved",
            )),
        ),
        Err(e) => db_error(e, "Service requests"),
    }
}

/// GET /service-requests/{id}
///
/// `404` when the id is unknown.
pub async fn get_service_request(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let found = service_request::Model::find_by_id(app_state.db(), id)
        .await
        .and_then(|m| m.ok_or_else(|| DbErr::RecordNotFound(id.to_string())));

    match found {
        Ok(m) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ServiceRequestResponse::from(m),
                "Service request retrieved",
            )),
        ),
        Err(e) => db_error(e, "Service request"),
    }
}
