#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::service_request;
    use db::test_utils::sample_service_request;
    use realtime::Topic;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn put_status(id: i64, status: &str) -> Request<AxumBody> {
        Request::builder()
            .method("PUT")
            .uri(format!("/api/service-requests/{id}/status"))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(json!({ "status": status }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn get_by_id_and_missing() {
        let (app, state, _tmp) = make_test_app().await;
        let created = service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();

        let get = |uri: String| {
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
                .body(AxumBody::empty())
                .unwrap()
        };

        let found = app
            .clone()
            .oneshot(get(format!("/api/service-requests/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await["data"]["city"], "Paris");

        let missing = app
            .oneshot(get("/api/service-requests/404".into()))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await["message"], "Service request not found");
    }

    #[tokio::test]
    #[serial]
    async fn status_update_publishes_on_demandes() {
        let (app, state, _tmp) = make_test_app().await;
        let created = service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();
        let mut demandes = state.ws().subscribe(Topic::Demandes).await;

        let response = app
            .clone()
            .oneshot(put_status(created.id, "in_progress"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let frame: Value = serde_json::from_str(&demandes.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["status"], "in_progress");
        assert_eq!(frame["payload"]["referenceNumber"], created.reference_number.as_str());

        let bad = app.oneshot(put_status(created.id, "teleported")).await.unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}
