use api::auth::{hash_password, middleware::log_request};
use api::routes::routes;
use api::ws::ws_routes;
use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use migration::{Migrator, MigratorTrait};
use realtime::Topic;
use std::{net::SocketAddr, time::Duration};
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::system_health::sample_performance;
use util::ws::{WebSocketManager, emit};
use util::{config, state::AppState};

#[tokio::main]
async fn main() {
    // `api --hash-password <pw>` prints a value for ADMIN_PASSWORD_HASH.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--hash-password") {
        match args.get(2).map(|pw| hash_password(pw)) {
            Some(Ok(hash)) => println!("{hash}"),
            Some(Err(e)) => eprintln!("Could not hash password: {e}"),
            None => eprintln!("Usage: api --hash-password <password>"),
        }
        return;
    }

    let _log_guard = init_logging(&config::log_file());

    if config::jwt_secret().is_empty() {
        tracing::warn!("JWT_SECRET is empty; issued tokens are trivially forgeable");
    }

    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app_state = AppState::new(db, WebSocketManager::new());

    spawn_performance_broadcaster(app_state.ws_clone());

    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    let app = Router::new()
        .nest("/api", routes(app_state.clone()))
        .nest("/ws", ws_routes(app_state.clone()))
        .layer(from_fn(log_request))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    tracing::info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true)
    });

    let env_filter = EnvFilter::try_new(config::log_level())
        .unwrap_or_else(|_| EnvFilter::new("api=info,util=info,services=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

/// Publishes a host sample on `performance` every `PERFORMANCE_BROADCAST_MS`.
/// Samples taken while nobody listens are dropped.
fn spawn_performance_broadcaster(ws: WebSocketManager) {
    let interval_ms = config::performance_broadcast_ms().max(1000);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            ticker.tick().await;
            if ws.subscriber_count(Topic::Performance).await == 0 {
                continue;
            }

            let env = config::env();
            match tokio::task::spawn_blocking(move || sample_performance(&env)).await {
                Ok(sample) => {
                    emit(&ws, Topic::Performance, &sample).await;
                }
                Err(e) => tracing::warn!(error = %e, "performance sampling task failed"),
            }
        }
    });
}
