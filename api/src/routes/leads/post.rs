use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::notification::NotificationKind;
use db::models::service_request::{self, NewServiceRequest};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{db_error, format_validation_errors};
use crate::routes::service_requests::common::ServiceRequestResponse;
use crate::services::email::{EmailError, EmailService};
use crate::ws::emit;

/// Final submission of the multi-step connection form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Connection type is required"))]
    pub connection_type: String,
    #[validate(range(min = 1, max = 250, message = "Power must be between 1 and 250 kVA"))]
    pub power_kva: Option<i32>,
    pub comments: Option<String>,
}

impl From<CreateLeadRequest> for NewServiceRequest {
    fn from(r: CreateLeadRequest) -> Self {
        Self {
            first_name: r.first_name.trim().to_owned(),
            last_name: r.last_name.trim().to_owned(),
            email: r.email.trim().to_owned(),
            phone: r.phone.trim().to_owned(),
            address: r.address.trim().to_owned(),
            postal_code: r.postal_code.trim().to_owned(),
            city: r.city.trim().to_owned(),
            connection_type: r.connection_type,
            power_kva: r.power_kva,
            comments: r.comments.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// POST /leads
///
/// Public. Stores the request, assigns its `RAC-<year>-<id>` reference and
/// then, best-effort:
/// - publishes it on `leads` and `demandes`
/// - records a "Nouveau lead" notification (published on `notifications`)
/// - publishes fresh stats on `dashboard`
/// - emails `ADMIN_NOTIFICATION_EMAIL`, in the background
///
/// ### Responses
/// - `201 Created` with the stored request
/// - `400 Bad Request` (validation failure)
/// - `500 Internal Server Error`
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(req): Json<CreateLeadRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ServiceRequestResponse>::error(
                format_validation_errors(&validation_errors),
            )),
        );
    }

    let db = app_state.db();
    let lead = match service_request::Model::create(db, req.into()).await {
        Ok(lead) => lead,
        Err(e) => return db_error(e, "Lead"),
    };
    tracing::info!(id = lead.id, reference = %lead.reference_number, "lead created");

    let ws = app_state.ws();
    emit::lead_created(ws, &lead).await;
    emit::record_notification(
        ws,
        db,
        NotificationKind::Lead,
        "Nouveau lead",
        &format!("{} - Réf: {}", lead.full_name(), lead.reference_number),
    )
    .await;
    emit::dashboard_changed(ws, db).await;

    let alert = lead.clone();
    tokio::spawn(async move {
        match EmailService::send_lead_alert(&alert).await {
            Ok(()) => {}
            Err(EmailError::NotConfigured) => {
                tracing::debug!(id = alert.id, "lead alert skipped: email not configured")
            }
            Err(e) => tracing::warn!(id = alert.id, error = %e, "lead alert email failed"),
        }
    });

    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            ServiceRequestResponse::from(lead),
            "Lead created successfully",
        )),
    )
}
