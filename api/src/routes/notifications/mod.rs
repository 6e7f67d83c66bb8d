pub mod common;
pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::{list_notifications, list_unread};
use post::mark_read;

/// - `GET /notifications` → `list_notifications`
/// - `GET /notifications/unread` → `list_unread`
/// - `POST /notifications/{id}/mark-read` → `mark_read`
pub fn notifications_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread", get(list_unread))
        .route("/{id}/mark-read", post(mark_read))
}
