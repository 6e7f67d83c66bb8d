#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::contact_message;
    use realtime::Topic;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn public_message_is_listed_for_admin() {
        let (app, state, _tmp) = make_test_app().await;
        let mut contacts = state.ws().subscribe(Topic::Contacts).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contacts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(AxumBody::from(
                        json!({
                            "name": "Jean Dupont",
                            "email": "jean@exemple.fr",
                            "subject": "Délais",
                            "message": "Quels sont les délais ?"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let frame: Value = serde_json::from_str(&contacts.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "contacts");
        assert_eq!(frame["payload"]["name"], "Jean Dupont");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/contacts")
                    .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
                    .body(AxumBody::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"][0]["subject"], "Délais");
        assert_eq!(json["data"][0]["read"], false);
    }

    fn admin_post(uri: &str) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn mark_read_lowers_unread_contacts() {
        let (app, state, _tmp) = make_test_app().await;
        let first = contact_message::Model::create(state.db(), "Jean", "jean@exemple.fr", None, None, "Un")
            .await
            .unwrap();
        contact_message::Model::create(state.db(), "Anne", "anne@exemple.fr", None, None, "Deux")
            .await
            .unwrap();

        let anonymous = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contacts/mark-read")
                    .body(AxumBody::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(admin_post(&format!("/api/contacts/{}/mark-read", first.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(contact_message::Model::count_unread(state.db()).await.unwrap(), 1);

        let response = app
            .oneshot(admin_post("/api/contacts/mark-read"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"]["updated"], 1);

        let stats = services::dashboard::DashboardStats::compute(state.db()).await.unwrap();
        assert_eq!(stats.unread_contacts, 0);
    }
}
