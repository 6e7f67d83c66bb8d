//! Messages from the public contact form.

pub mod common;
pub mod get;
pub mod post;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_admin;
use get::list_contacts;
use post::{create_contact, mark_all_read, mark_read};

/// - `GET /contacts` → `list_contacts` (admin)
/// - `POST /contacts` → `create_contact` (public)
/// - `POST /contacts/mark-read` → `mark_all_read` (admin)
/// - `POST /contacts/{id}/mark-read` → `mark_read` (admin)
pub fn contacts_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_contacts)
                .route_layer(from_fn(allow_admin))
                .post(create_contact),
        )
        .route(
            "/mark-read",
            post(mark_all_read).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{id}/mark-read",
            post(mark_read).route_layer(from_fn(allow_admin)),
        )
}
