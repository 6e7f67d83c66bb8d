#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::notification::{self, NotificationKind};
    use serial_test::serial;
    use tower::ServiceExt;

    fn request(method: &str, uri: &str) -> Request<AxumBody> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn unread_list_shrinks_after_mark_read() {
        let (app, state, _tmp) = make_test_app().await;
        let first = notification::Model::create(state.db(), NotificationKind::Lead, "Nouveau lead", "a")
            .await
            .unwrap();
        notification::Model::create(state.db(), NotificationKind::Payment, "Nouveau paiement reçu", "b")
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(request("GET", "/api/notifications/unread"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["count"], 2);
        assert_eq!(json["data"]["notifications"][0]["kind"], "payment");

        let response = app
            .clone()
            .oneshot(request("POST", &format!("/api/notifications/{}/mark-read", first.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["read"], true);

        // Idempotent.
        let again = app
            .clone()
            .oneshot(request("POST", &format!("/api/notifications/{}/mark-read", first.id)))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::OK);

        let json = body_json(
            app.clone()
                .oneshot(request("GET", "/api/notifications/unread"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json["data"]["count"], 1);

        let all = body_json(app.oneshot(request("GET", "/api/notifications")).await.unwrap()).await;
        assert_eq!(all["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn mark_read_unknown_is_not_found() {
        let (app, _state, _tmp) = make_test_app().await;
        let response = app
            .oneshot(request("POST", "/api/notifications/77/mark-read"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
