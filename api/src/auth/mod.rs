pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::rngs::OsRng;
use util::config;

/// Subject used in tokens issued to the back-office administrator. There is
/// a single configured admin account, not a users table.
pub const ADMIN_SUBJECT: i64 = 1;

/// Generates a JWT and its RFC 3339 expiry for the given subject.
pub fn generate_jwt(
    user_id: i64,
    admin: bool,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);

    let claims = Claims {
        sub: user_id,
        admin,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}

/// Hashes a password into an argon2 PHC string suitable for
/// `ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a login attempt against the configured admin credentials.
pub fn verify_admin_credentials(username: &str, password: &str) -> bool {
    if username != config::admin_username() {
        return false;
    }

    let stored = config::admin_password_hash();
    if stored.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH is not set; refusing every login");
        return false;
    }

    match PasswordHash::new(&stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "ADMIN_PASSWORD_HASH is not a valid argon2 hash");
            false
        }
    }
}
