use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::email::{self, EmailDirection, NewEmail};
use db::models::notification::NotificationKind;
use serde::Deserialize;
use util::{config, state::AppState};
use validator::Validate;

use super::common::EmailResponse;
use crate::response::ApiResponse;
use crate::routes::common::{MarkedReadResponse, db_error, format_validation_errors};
use crate::services::email::{EmailError, EmailService};
use crate::ws::emit;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[validate(email(message = "Invalid recipient address"))]
    pub to: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    pub service_request_id: Option<i64>,
}

/// POST /emails/send
///
/// Delivers over SMTP, then records the outbound mail and publishes it on
/// `emails`. Nothing is recorded when delivery fails.
///
/// ### Responses
/// - `201 Created` with the recorded mail
/// - `400 Bad Request` (validation failure)
/// - `502 Bad Gateway` when the SMTP server refuses the message
/// - `503 Service Unavailable` when SMTP is not configured
pub async fn send_email(
    State(app_state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<EmailResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    if let Err(e) = EmailService::send_plain(&req.to, &req.subject, &req.body).await {
        let status = match &e {
            EmailError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            EmailError::Address(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!(to = %req.to, error = %e, "outgoing email failed");
        return (status, Json(ApiResponse::error(e.to_string())));
    }

    let recorded = email::Model::create(
        app_state.db(),
        NewEmail {
            direction: EmailDirection::Outbound,
            from_address: config::smtp_username(),
            to_address: req.to,
            subject: req.subject,
            body: req.body,
            service_request_id: req.service_request_id,
        },
    )
    .await;

    match recorded {
        Ok(m) => {
            emit::email_recorded(app_state.ws(), &m).await;
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(EmailResponse::from(m), "Email sent")),
            )
        }
        Err(e) => db_error(e, "Email"),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InboundEmailRequest {
    #[validate(email(message = "Invalid sender address"))]
    pub from: String,
    pub to: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub service_request_id: Option<i64>,
}

/// POST /emails/inbound
///
/// Records a received mail as unread, publishes it on `emails`, records a
/// "Nouvel email" notification and publishes fresh stats on `dashboard`.
///
/// ### Responses
/// - `201 Created` with the recorded mail
/// - `400 Bad Request` (validation failure)
pub async fn receive_inbound(
    State(app_state): State<AppState>,
    Json(req): Json<InboundEmailRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<EmailResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let db = app_state.db();
    let ws = app_state.ws();

    let recorded = email::Model::create(
        db,
        NewEmail {
            direction: EmailDirection::Inbound,
            from_address: req.from,
            to_address: req
                .to
                .unwrap_or_else(config::admin_notification_email),
            subject: req.subject,
            body: req.body,
            service_request_id: req.service_request_id,
        },
    )
    .await;

    let m = match recorded {
        Ok(m) => m,
        Err(e) => return db_error(e, "Email"),
    };

    emit::email_recorded(ws, &m).await;
    let subject = if m.subject.trim().is_empty() {
        "Sans objet"
    } else {
        m.subject.as_str()
    };
    emit::record_notification(
        ws,
        db,
        NotificationKind::Email,
        "Nouvel email",
        &format!("{subject} - De: {}", m.from_address),
    )
    .await;
    emit::dashboard_changed(ws, db).await;

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(EmailResponse::from(m), "Email recorded")),
    )
}

/// POST /emails/{id}/mark-read
///
/// Idempotent. Publishes fresh stats on `dashboard`.
///
/// ### Responses
/// - `200 OK` with the mail
/// - `404 Not Found`
pub async fn mark_read(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match email::Model::mark_read(app_state.db(), id).await {
        Ok(m) => {
            emit::dashboard_changed(app_state.ws(), app_state.db()).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(EmailResponse::from(m), "Email marked as read")),
            )
        }
        Err(e) => db_error(e, "Email"),
    }
}

/// POST /emails/mark-read
///
/// Marks every inbound mail read, which zeroes `GET /email-unread-count`.
///
/// ```json
/// { "success": true, "data": { "updated": 3 }, "message": "..." }
/// ```
pub async fn mark_all_read(State(app_state): State<AppState>) -> impl IntoResponse {
    match email::Model::mark_all_read(app_state.db()).await {
        Ok(updated) => {
            emit::dashboard_changed(app_state.ws(), app_state.db()).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    MarkedReadResponse { updated },
                    "Emails marked as read",
                )),
            )
        }
        Err(e) => db_error(e, "Emails"),
    }
}
