use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use services::dashboard::DashboardStats;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::db_error;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /dashboard/stats
async fn get_stats(State(app_state): State<AppState>) -> impl IntoResponse {
    match DashboardStats::compute(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Dashboard stats retrieved")),
        ),
        Err(e) => db_error(e, "Dashboard stats"),
    }
}
