pub mod common;
pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::list_emails;
use post::{mark_all_read, mark_read, receive_inbound, send_email};

/// - `GET /emails` → `list_emails`
/// - `POST /emails/send` → `send_email`
/// - `POST /emails/inbound` → `receive_inbound`
/// - `POST /emails/mark-read` → `mark_all_read`
/// - `POST /emails/{id}/mark-read` → `mark_read`
///
/// `GET /email-unread-count` lives at the API root; see [`get::email_unread_count`].
pub fn emails_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_emails))
        .route("/send", post(send_email))
        .route("/inbound", post(receive_inbound))
        .route("/mark-read", post(mark_all_read))
        .route("/{id}/mark-read", post(mark_read))
}
