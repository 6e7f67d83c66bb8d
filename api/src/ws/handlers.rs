use axum::{
    Extension,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};
use util::state::AppState;
use util::ws::{WsServerOptions, serve_channel};

use crate::auth::AuthUser;

/// GET /ws/realtime
///
/// Upgrades to the shared real-time channel. The socket receives every
/// topic as `{ "type": <topic>, "payload": ... }` frames, WebSocket pings
/// every 30 seconds, and answers `{"type":"ping"}` with `{"type":"pong"}`.
pub async fn realtime_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    let manager = app_state.ws_clone();
    tracing::debug!(user = claims.sub, "realtime channel upgrade");
    let user = claims.sub;
    ws.on_upgrade(move |socket| async move {
        serve_channel(socket, manager, WsServerOptions::default()).await;
        tracing::info!(user, "realtime session ended");
    })
}
