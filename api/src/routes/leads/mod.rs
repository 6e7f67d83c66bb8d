//! Leads are connection requests as they arrive from the public form.

pub mod get;
pub mod post;

use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_admin;
use get::list_leads;
use post::create_lead;

/// - `GET /leads` → `list_leads` (admin)
/// - `POST /leads` → `create_lead` (public)
pub fn leads_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_leads)
            .route_layer(from_fn(allow_admin))
            .post(create_lead),
    )
}
