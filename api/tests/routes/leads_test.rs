#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app, user_token};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use chrono::Datelike;
    use realtime::Topic;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    pub fn lead_body() -> Value {
        json!({
            "firstName": "Marie",
            "lastName": "Curie",
            "email": "marie@exemple.fr",
            "phone": "0601020304",
            "address": "1 rue de la Paix",
            "postalCode": "75002",
            "city": "Paris",
            "connectionType": "maison_individuelle",
            "powerKva": 12
        })
    }

    fn post_lead(body: Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri("/api/leads")
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    fn get_leads(token: Option<&str>) -> Request<AxumBody> {
        let mut req = Request::builder().method("GET").uri("/api/leads");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req.body(AxumBody::empty()).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn public_submission_creates_reference_and_publishes() {
        let (app, state, _tmp) = make_test_app().await;
        let mut leads = state.ws().subscribe(Topic::Leads).await;
        let mut demandes = state.ws().subscribe(Topic::Demandes).await;
        let mut notifications = state.ws().subscribe(Topic::Notifications).await;
        let mut dashboard = state.ws().subscribe(Topic::Dashboard).await;

        let response = app.oneshot(post_lead(lead_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        let expected = format!("RAC-{}-0001", chrono::Utc::now().year());
        assert_eq!(json["data"]["referenceNumber"], expected);
        assert_eq!(json["data"]["status"], "new");

        let frame: Value = serde_json::from_str(&leads.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "leads");
        assert_eq!(frame["payload"]["firstName"], "Marie");
        assert_eq!(frame["payload"]["referenceNumber"], expected);

        let frame: Value = serde_json::from_str(&demandes.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "demandes");

        let frame: Value = serde_json::from_str(&notifications.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["title"], "Nouveau lead");
        assert_eq!(frame["payload"]["message"], format!("Marie Curie - Réf: {expected}"));

        let frame: Value = serde_json::from_str(&dashboard.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["totalLeads"], 1);
        assert_eq!(frame["payload"]["newLeads"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_submission_is_rejected() {
        let (app, _state, _tmp) = make_test_app().await;
        let mut body = lead_body();
        body["email"] = json!("not-an-email");

        let response = app.oneshot(post_lead(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid email format");
    }

    #[tokio::test]
    #[serial]
    async fn listing_requires_admin() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app.clone().oneshot(get_leads(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(get_leads(Some(&user_token())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        app.clone().oneshot(post_lead(lead_body())).await.unwrap();
        let response = app.oneshot(get_leads(Some(&admin_token()))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }
}
