use axum::{Json, http::StatusCode};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::response::ApiResponse;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 200;

/// Joins every field-level validation message with `"; "`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Body of the bulk mark-read endpoints.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MarkedReadResponse {
    pub updated: u64,
}

/// `404` for a missing record, `500` for anything else.
pub fn db_error<T>(e: DbErr, what: &str) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    match e {
        DbErr::RecordNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("{what} not found"))),
        ),
        other => {
            tracing::error!(error = %other, "{what}: database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {other}"))),
            )
        }
    }
}
