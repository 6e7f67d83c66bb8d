use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::contact_message;
use db::models::notification::NotificationKind;
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use super::common::ContactResponse;
use crate::response::ApiResponse;
use crate::routes::common::{MarkedReadResponse, db_error, format_validation_errors};
use crate::ws::emit;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message must be 1 to 5000 characters"))]
    pub message: String,
}

/// POST /contacts
///
/// Public. Stores the message, publishes it on `contacts`, records a
/// notification and publishes fresh stats on `dashboard`.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
pub async fn create_contact(
    State(app_state): State<AppState>,
    Json(req): Json<CreateContactRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ContactResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let db = app_state.db();
    let ws = app_state.ws();

    let created = contact_message::Model::create(
        db,
        req.name.trim(),
        req.email.trim(),
        req.phone.filter(|p| !p.trim().is_empty()),
        req.subject.filter(|s| !s.trim().is_empty()),
        &req.message,
    )
    .await;
    let m = match created {
        Ok(m) => m,
        Err(e) => return db_error(e, "Contact message"),
    };

    emit::contact_received(ws, &m).await;
    let summary = match &m.subject {
        Some(subject) => format!("{} - {subject}", m.name),
        None => m.name.clone(),
    };
    emit::record_notification(ws, db, NotificationKind::Contact, "Nouveau message de contact", &summary)
        .await;
    emit::dashboard_changed(ws, db).await;

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(ContactResponse::from(m), "Message received")),
    )
}

/// POST /contacts/{id}/mark-read
///
/// Admin. Idempotent; publishes fresh stats on `dashboard`.
pub async fn mark_read(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match contact_message::Model::mark_read(app_state.db(), id).await {
        Ok(m) => {
            emit::dashboard_changed(app_state.ws(), app_state.db()).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ContactResponse::from(m),
                    "Contact message marked as read",
                )),
            )
        }
        Err(e) => db_error(e, "Contact message"),
    }
}

/// POST /contacts/mark-read
///
/// Admin. Marks every message read.
pub async fn mark_all_read(State(app_state): State<AppState>) -> impl IntoResponse {
    match contact_message::Model::mark_all_read(app_state.db()).await {
        Ok(updated) => {
            emit::dashboard_changed(app_state.ws(), app_state.db()).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    MarkedReadResponse { updated },
                    "Contact messages marked as read",
                )),
            )
        }
        Err(e) => db_error(e, "Contact messages"),
    }
}
