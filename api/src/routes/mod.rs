//! HTTP route entry point for `/api/...`.
//!
//! Public: `/health`, `/auth`, `POST /leads` and `POST /contacts` (the two
//! forms on the public site). Everything else is back-office and sits behind
//! [`allow_admin`].

use crate::auth::guards::allow_admin;
use crate::routes::{
    auth::auth_routes, contacts::contacts_routes, dashboard::dashboard_routes,
    emails::emails_routes, health::health_routes, leads::leads_routes,
    notifications::notifications_routes, payments::payments_routes,
    performance::performance_routes, service_requests::service_requests_routes,
};
use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod contacts;
pub mod dashboard;
pub mod emails;
pub mod health;
pub mod leads;
pub mod notifications;
pub mod payments;
pub mod performance;
pub mod service_requests;

pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/leads", leads_routes())
        .nest("/contacts", contacts_routes())
        .nest(
            "/service-requests",
            service_requests_routes().route_layer(from_fn(allow_admin)),
        )
        .nest("/payments", payments_routes().route_layer(from_fn(allow_admin)))
        .nest("/emails", emails_routes().route_layer(from_fn(allow_admin)))
        .route(
            "/email-unread-count",
            get(emails::get::email_unread_count).route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/notifications",
            notifications_routes().route_layer(from_fn(allow_admin)),
        )
        .nest("/dashboard", dashboard_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/performance",
            performance_routes().route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
