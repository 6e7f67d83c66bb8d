//! WebSocket surface: the shared `/ws/realtime` channel and the helpers
//! routes use to publish onto it.

use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_admin;

pub mod emit;
pub mod handlers;

use handlers::realtime_ws_handler;

pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/realtime", get(realtime_ws_handler))
        .route_layer(from_fn(allow_admin))
        .with_state(app_state)
}
