//! One-liner publishers for each domain event.
//!
//! Payload field names match what the client feeds read (`referenceNumber`,
//! `amount` in cents, `from`, `subject`, ...). Every function here is
//! best-effort: failures are logged, never returned.

use db::models::notification::{self, NotificationKind};
use db::models::payment::{self, PaymentStatus};
use db::models::{contact_message, email, service_request};
use realtime::Topic;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use services::dashboard::DashboardStats;
use util::ws::{WebSocketManager, emit};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent<'a> {
    pub id: i64,
    pub reference_number: &'a str,
    /// Cents.
    pub amount: i64,
    pub currency: &'a str,
    pub status: PaymentStatus,
    pub service_request_id: Option<i64>,
}

impl<'a> From<&'a payment::Model> for PaymentEvent<'a> {
    fn from(p: &'a payment::Model) -> Self {
        Self {
            id: p.id,
            reference_number: &p.reference_number,
            amount: p.amount_cents,
            currency: &p.currency,
            status: p.status,
            service_request_id: p.service_request_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEvent<'a> {
    pub id: i64,
    pub from: &'a str,
    pub to: &'a str,
    pub subject: &'a str,
    pub direction: email::EmailDirection,
}

impl<'a> From<&'a email::Model> for EmailEvent<'a> {
    fn from(m: &'a email::Model) -> Self {
        Self {
            id: m.id,
            from: &m.from_address,
            to: &m.to_address,
            subject: &m.subject,
            direction: m.direction,
        }
    }
}

/// A new request is both a lead and a demande.
pub async fn lead_created(ws: &WebSocketManager, lead: &service_request::Model) {
    emit(ws, Topic::Leads, lead).await;
    emit(ws, Topic::Demandes, lead).await;
}

pub async fn request_updated(ws: &WebSocketManager, request: &service_request::Model) {
    emit(ws, Topic::Demandes, request).await;
}

pub async fn payment_recorded(ws: &WebSocketManager, p: &payment::Model) {
    emit(ws, Topic::Paiements, &PaymentEvent::from(p)).await;
}

pub async fn email_recorded(ws: &WebSocketManager, m: &email::Model) {
    emit(ws, Topic::Emails, &EmailEvent::from(m)).await;
}

pub async fn contact_received(ws: &WebSocketManager, m: &contact_message::Model) {
    emit(ws, Topic::Contacts, m).await;
}

/// Recomputes the dashboard numbers and publishes them.
pub async fn dashboard_changed(ws: &WebSocketManager, db: &DatabaseConnection) {
    match DashboardStats::compute(db).await {
        Ok(stats) => {
            emit(ws, Topic::Dashboard, &stats).await;
        }
        Err(e) => tracing::warn!(error = %e, "could not compute dashboard stats"),
    }
}

/// Stores a back-office notification and publishes it.
pub async fn record_notification(
    ws: &WebSocketManager,
    db: &DatabaseConnection,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> Option<notification::Model> {
    match notification::Model::create(db, kind, title, message).await {
        Ok(n) => {
            emit(ws, Topic::Notifications, &n).await;
            Some(n)
        }
        Err(e) => {
            tracing::warn!(%kind, error = %e, "could not store notification");
            None
        }
    }
}
