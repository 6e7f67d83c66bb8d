//! Application state shared by every axum handler through `State<AppState>`.

use crate::ws::WebSocketManager;
use sea_orm::DatabaseConnection;

/// Database connection plus the topic broadcast manager. Both are cheap to
/// clone and shared between clones.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self { db, ws }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    /// Owned connection, for spawned tasks.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn ws_clone(&self) -> WebSocketManager {
        self.ws.clone()
    }
}
