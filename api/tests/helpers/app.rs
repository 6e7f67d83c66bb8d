use api::auth::{ADMIN_SUBJECT, generate_jwt, hash_password};
use api::routes::routes;
use api::ws::ws_routes;
use axum::{Router, body::Body, http::Response};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::Value;
use std::sync::OnceLock;
use tempfile::TempDir;
use util::config::AppConfig;
use util::state::AppState;
use util::test_helpers::setup_test_certificates_dir;
use util::ws::WebSocketManager;

pub const ADMIN_PASSWORD: &str = "correct horse";

/// Hashing is slow in debug builds; do it once per test binary.
fn admin_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hash admin password"))
}

/// Fresh in-memory database, fresh broadcast manager, test configuration
/// and a temporary certificates directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn make_test_app() -> (Router, AppState, TempDir) {
    AppConfig::reset();
    AppConfig::set_env("test");
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_jwt_duration_minutes(60);
    AppConfig::set_admin_username("admin");
    AppConfig::set_admin_password_hash(admin_hash());
    AppConfig::set_smtp_host("");
    let tmp = setup_test_certificates_dir();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app_state = AppState::new(db, WebSocketManager::new());
    let router = Router::new()
        .nest("/api", routes(app_state.clone()))
        .nest("/ws", ws_routes(app_state.clone()));

    (router, app_state, tmp)
}

pub fn admin_token() -> String {
    generate_jwt(ADMIN_SUBJECT, true).expect("sign token").0
}

pub fn user_token() -> String {
    generate_jwt(42, false).expect("sign token").0
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
