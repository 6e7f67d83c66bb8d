use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{ADMIN_SUBJECT, generate_jwt, verify_admin_credentials};
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub username: String,
    pub admin: bool,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Exchanges the back-office credentials for a JWT.
///
/// ### Request Body
/// ```json
/// { "username": "admin", "password": "..." }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ username, admin, token, expires_at }`
/// - `400 Bad Request` when a field is empty
/// - `401 Unauthorized` on bad credentials
/// - `500 Internal Server Error` if the token cannot be signed
pub async fn login(Json(req): Json<LoginRequest>) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    if !verify_admin_credentials(&req.username, &req.password) {
        tracing::warn!(username = %req.username, "failed login");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid username or password")),
        );
    }

    match generate_jwt(ADMIN_SUBJECT, true) {
        Ok((token, expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse {
                    username: req.username,
                    admin: true,
                    token,
                    expires_at,
                },
                "Login successful",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "could not sign token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Could not issue token")),
            )
        }
    }
}
