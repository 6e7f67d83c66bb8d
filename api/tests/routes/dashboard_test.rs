#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, body_json, make_test_app, user_token};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::service_request;
    use db::test_utils::sample_service_request;
    use serial_test::serial;
    use tower::ServiceExt;

    fn get(uri: &str, token: &str) -> Request<AxumBody> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(AxumBody::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn stats_reflect_database() {
        let (app, state, _tmp) = make_test_app().await;
        service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/api/dashboard/stats", &admin_token()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["totalLeads"], 1);
        assert_eq!(json["data"]["paidAmount"], 0);

        let forbidden = app
            .oneshot(get("/api/dashboard/stats", &user_token()))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn performance_sample_is_served() {
        let (app, _state, _tmp) = make_test_app().await;
        let response = app
            .oneshot(get("/api/performance", &admin_token()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["env"], "test");
        assert!(json["data"]["cpu_cores"].is_u64());
    }
}
