use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use util::{config, state::AppState, system_health::{PerformanceSample, sample_performance}};

use crate::response::ApiResponse;

pub fn performance_routes() -> Router<AppState> {
    Router::new().route("/", get(get_performance))
}

/// GET /performance
///
/// Takes a fresh host sample. Sampling sleeps for the CPU measurement
/// window, so it runs on the blocking pool.
async fn get_performance() -> impl IntoResponse {
    let env = config::env();
    match tokio::task::spawn_blocking(move || sample_performance(&env)).await {
        Ok(sample) => (
            StatusCode::OK,
            Json(ApiResponse::success(sample, "Performance sample taken")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "performance sampling task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<PerformanceSample>::error("Could not sample performance")),
            )
        }
    }
}
