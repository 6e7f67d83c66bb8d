#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use realtime::Topic;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn post(uri: &str, body: Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<AxumBody> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn inbound_mail_counts_as_unread_and_publishes() {
        let (app, state, _tmp) = make_test_app().await;
        let mut emails = state.ws().subscribe(Topic::Emails).await;
        let mut notifications = state.ws().subscribe(Topic::Notifications).await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/emails/inbound",
                json!({ "from": "client@exemple.fr", "subject": "Dossier", "body": "Bonjour" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let frame: Value = serde_json::from_str(&emails.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "emails");
        assert_eq!(frame["payload"]["from"], "client@exemple.fr");
        assert_eq!(frame["payload"]["subject"], "Dossier");

        let frame: Value = serde_json::from_str(&notifications.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["message"], "Dossier - De: client@exemple.fr");

        let count = body_json(app.clone().oneshot(get("/api/email-unread-count")).await.unwrap()).await;
        assert_eq!(count["data"]["count"], 1);

        let list = body_json(app.oneshot(get("/api/emails")).await.unwrap()).await;
        assert_eq!(list["data"][0]["direction"], "inbound");
    }

    #[tokio::test]
    #[serial]
    async fn sending_without_smtp_is_unavailable_and_not_recorded() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/emails/send",
                json!({ "to": "client@exemple.fr", "subject": "Suivi", "body": "Bonjour" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let list = body_json(app.oneshot(get("/api/emails")).await.unwrap()).await;
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn unread_count_requires_admin() {
        let (app, _state, _tmp) = make_test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/email-unread-count")
                    .body(AxumBody::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn mark_read_brings_unread_count_down() {
        let (app, state, _tmp) = make_test_app().await;
        let inbound = json!({ "from": "client@exemple.fr", "subject": "Dossier", "body": "Bonjour" });
        let mut ids = Vec::new();
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(post("/api/emails/inbound", inbound.clone()))
                .await
                .unwrap();
            ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
        }

        let mut dashboard = state.ws().subscribe(Topic::Dashboard).await;
        let response = app
            .clone()
            .oneshot(post(&format!("/api/emails/{}/mark-read", ids[0]), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["read"], true);

        let frame: Value = serde_json::from_str(&dashboard.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["unreadEmails"], 2);

        let count = body_json(app.clone().oneshot(get("/api/email-unread-count")).await.unwrap()).await;
        assert_eq!(count["data"]["count"], 2);

        let response = app
            .clone()
            .oneshot(post("/api/emails/mark-read", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["updated"], 2);

        let count = body_json(app.clone().oneshot(get("/api/email-unread-count")).await.unwrap()).await;
        assert_eq!(count["data"]["count"], 0);

        let missing = app
            .oneshot(post("/api/emails/999/mark-read", json!({})))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
