//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton holding
//! runtime configuration loaded from `.env` and the process environment. The
//! free functions at the bottom of this module are the usual way to read it;
//! the per-field setters exist for tests and runtime overrides.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub admin_username: String,
    /// Argon2 PHC string.
    pub admin_password_hash: String,
    pub certificates_dir: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub admin_notification_email: String,
    pub performance_broadcast_ms: u64,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw:?} is not valid; using the default");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "raccordement"),
            log_level: var_or("LOG_LEVEL", "api=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "data/raccordement.db"),
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_duration_minutes: parse_or("JWT_DURATION_MINUTES", 60),
            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").unwrap_or_default(),
            certificates_dir: var_or("CERTIFICATES_DIR", "certificates"),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: parse_or("SMTP_PORT", 587),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            email_from_name: var_or("EMAIL_FROM_NAME", "Raccordement Enedis"),
            admin_notification_email: env::var("ADMIN_NOTIFICATION_EMAIL").unwrap_or_default(),
            performance_broadcast_ms: parse_or("PERFORMANCE_BROADCAST_MS", 5000),
        }
    }

    /// Returns a read guard on the global configuration.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Reloads from the environment, dropping every override.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: u64) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value);
    }

    pub fn set_admin_username(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.admin_username = value.into());
    }

    pub fn set_admin_password_hash(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.admin_password_hash = value.into());
    }

    pub fn set_certificates_dir(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.certificates_dir = value.into());
    }

    pub fn set_smtp_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.smtp_host = value.into());
    }

    pub fn set_admin_notification_email(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.admin_notification_email = value.into());
    }

    pub fn set_performance_broadcast_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.performance_broadcast_ms = value);
    }
}

// --- Accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn admin_username() -> String {
    AppConfig::global().admin_username.clone()
}

pub fn admin_password_hash() -> String {
    AppConfig::global().admin_password_hash.clone()
}

pub fn certificates_dir() -> String {
    AppConfig::global().certificates_dir.clone()
}

pub fn smtp_host() -> String {
    AppConfig::global().smtp_host.clone()
}

pub fn smtp_port() -> u16 {
    AppConfig::global().smtp_port
}

pub fn smtp_username() -> String {
    AppConfig::global().smtp_username.clone()
}

pub fn smtp_password() -> String {
    AppConfig::global().smtp_password.clone()
}

pub fn email_from_name() -> String {
    AppConfig::global().email_from_name.clone()
}

pub fn admin_notification_email() -> String {
    AppConfig::global().admin_notification_email.clone()
}

pub fn performance_broadcast_ms() -> u64 {
    AppConfig::global().performance_broadcast_ms
}
