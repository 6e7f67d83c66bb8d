pub mod app;
pub mod ws;

pub use app::{admin_token, body_json, make_test_app, user_token};
pub use ws::{connect_ws, spawn_server};
