#[cfg(test)]
mod tests {
    use crate::helpers::app::ADMIN_PASSWORD;
    use crate::helpers::{body_json, make_test_app};
    use api::auth::extractors::decode_token;
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    fn login(body: serde_json::Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn login_with_admin_credentials_issues_admin_token() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .oneshot(login(json!({ "username": "admin", "password": ADMIN_PASSWORD })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["admin"], true);
        let claims = decode_token(json["data"]["token"].as_str().unwrap()).unwrap();
        assert!(claims.admin);
    }

    #[tokio::test]
    #[serial]
    async fn wrong_password_is_unauthorized() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .oneshot(login(json!({ "username": "admin", "password": "nope" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid username or password");
    }

    #[tokio::test]
    #[serial]
    async fn empty_fields_are_rejected() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .oneshot(login(json!({ "username": "", "password": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Password is required; Username is required");
    }
}
