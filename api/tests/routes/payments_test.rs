#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::service_request::{self, ServiceRequestStatus};
    use db::test_utils::sample_service_request;
    use realtime::Topic;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    fn post_payment(body: Value) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri("/api/payments")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<AxumBody> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn settled_payment_marks_request_paid_and_publishes() {
        let (app, state, _tmp) = make_test_app().await;
        let request = service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();
        let mut paiements = state.ws().subscribe(Topic::Paiements).await;
        let mut demandes = state.ws().subscribe(Topic::Demandes).await;

        let response = app
            .oneshot(post_payment(json!({
                "serviceRequestId": request.id,
                "amountCents": 12980,
                "cardLast4": "4242",
                "gatewayReference": "gw_1",
                "status": "succeeded"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["referenceNumber"], request.reference_number.as_str());
        assert_eq!(json["data"]["card"], "**** **** **** 4242");
        assert_eq!(json["data"]["currency"], "EUR");

        let frame: Value = serde_json::from_str(&paiements.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "paiements");
        assert_eq!(frame["payload"]["amount"], 12980);
        assert_eq!(frame["payload"]["referenceNumber"], request.reference_number.as_str());

        let frame: Value = serde_json::from_str(&demandes.recv().await.unwrap()).unwrap();
        assert_eq!(frame["payload"]["status"], "paid");

        let stored = service_request::Model::find_by_id(state.db(), request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ServiceRequestStatus::Paid);
    }

    #[tokio::test]
    #[serial]
    async fn rejects_bad_input() {
        let (app, _state, _tmp) = make_test_app().await;

        let unknown_status = app
            .clone()
            .oneshot(post_payment(json!({ "referenceNumber": "RAC-2025-0001", "amountCents": 100, "status": "maybe" })))
            .await
            .unwrap();
        assert_eq!(unknown_status.status(), StatusCode::BAD_REQUEST);

        let no_reference = app
            .clone()
            .oneshot(post_payment(json!({ "amountCents": 100, "status": "paid" })))
            .await
            .unwrap();
        assert_eq!(no_reference.status(), StatusCode::BAD_REQUEST);

        let zero_amount = app
            .clone()
            .oneshot(post_payment(json!({ "referenceNumber": "RAC-2025-0001", "amountCents": 0, "status": "paid" })))
            .await
            .unwrap();
        assert_eq!(zero_amount.status(), StatusCode::BAD_REQUEST);

        let unknown_request = app
            .oneshot(post_payment(json!({ "serviceRequestId": 999, "amountCents": 100, "status": "paid" })))
            .await
            .unwrap();
        assert_eq!(unknown_request.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn card_last4_must_be_four_digits() {
        let (app, _state, _tmp) = make_test_app().await;

        for card in ["abcd", "12a4", "123", "12345", "１２３４"] {
            let response = app
                .clone()
                .oneshot(post_payment(json!({
                    "referenceNumber": "RAC-2025-0001",
                    "amountCents": 100,
                    "cardLast4": card,
                    "status": "paid"
                })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "card {card:?}");
            let json = body_json(response).await;
            assert_eq!(json["message"], "Only the last 4 card digits may be stored");
        }
    }

    #[tokio::test]
    #[serial]
    async fn receipt_is_written_with_signature() {
        let (app, state, tmp) = make_test_app().await;
        let request = service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();

        let created = app
            .clone()
            .oneshot(post_payment(json!({
                "serviceRequestId": request.id,
                "amountCents": 12980,
                "cardLast4": "4242",
                "status": "paid"
            })))
            .await
            .unwrap();
        let id = body_json(created).await["data"]["id"].as_i64().unwrap();

        let response = app
            .oneshot(get(&format!("/api/payments/{id}/receipt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let signature = json["data"]["signature"].as_str().unwrap();
        assert!(signature.starts_with("D0A"));
        assert_eq!(signature.len(), 11);
        assert_eq!(json["data"]["hash"].as_str().unwrap().len(), 64);

        let file = tmp.path().join(format!("receipt_{id}.html"));
        let html = std::fs::read_to_string(file).unwrap();
        assert!(html.contains("129,80\u{a0}€"));
        assert!(html.contains(signature));
    }

    #[tokio::test]
    #[serial]
    async fn receipt_for_unpaid_or_missing_payment_is_server_error() {
        let (app, _state, _tmp) = make_test_app().await;

        let created = app
            .clone()
            .oneshot(post_payment(json!({
                "referenceNumber": "RAC-2025-0007",
                "amountCents": 5000,
                "status": "pending"
            })))
            .await
            .unwrap();
        let id = body_json(created).await["data"]["id"].as_i64().unwrap();

        let pending = app
            .clone()
            .oneshot(get(&format!("/api/payments/{id}/receipt")))
            .await
            .unwrap();
        assert_eq!(pending.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(pending).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("not paid"));

        let missing = app.oneshot(get("/api/payments/999/receipt")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
