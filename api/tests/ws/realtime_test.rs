#[cfg(test)]
mod tests {
    use crate::helpers::{admin_token, connect_ws, make_test_app, spawn_server, user_token};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::{notification, service_request};
    use db::test_utils::sample_service_request;
    use futures_util::{SinkExt, StreamExt};
    use realtime::feeds::{NotificationsFeed, PaiementsFeed};
    use realtime::{
        ApiClient, ChannelTransport, Notifier, RealtimeConfig, RealtimeContext, Toast, Topic,
        WsChannel,
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::{Error as WsError, Message};
    use tower::ServiceExt;
    use util::state::AppState;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Toast>>);

    impl Notifier for Recorder {
        fn notify(&self, toast: Toast) {
            self.0.lock().unwrap().push(toast);
        }
    }

    async fn wait_until<F: Fn() -> bool>(what: &str, f: F) {
        for _ in 0..100 {
            if f() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("timed out waiting for {what}");
    }

    async fn wait_for_server_subscriber(state: &AppState, topic: Topic) {
        for _ in 0..100 {
            if state.ws().subscriber_count(topic).await > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("no server-side subscriber on {topic}");
    }

    fn status_of(err: WsError) -> u16 {
        match err {
            WsError::Http(resp) => resp.status().as_u16(),
            other => panic!("expected an HTTP rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn upgrade_requires_admin_token() {
        let (app, _state, _tmp) = make_test_app().await;
        let addr = spawn_server(app).await.to_string();

        let err = connect_ws(&addr, "realtime", None).await.unwrap_err();
        assert_eq!(status_of(err), 401);

        let err = connect_ws(&addr, "realtime", Some(&user_token()))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), 403);

        assert!(connect_ws(&addr, "realtime", Some(&admin_token())).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn app_level_ping_gets_pong() {
        let (app, _state, _tmp) = make_test_app().await;
        let addr = spawn_server(app).await.to_string();
        let (mut socket, _) = connect_ws(&addr, "realtime", Some(&admin_token()))
            .await
            .unwrap();

        socket
            .send(Message::Text(json!({ "type": "ping" }).to_string().into()))
            .await
            .unwrap();

        let reply = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match socket.next().await {
                    Some(Ok(Message::Text(t))) => break serde_json::from_str::<Value>(t.as_str()).unwrap(),
                    Some(Ok(_)) => continue,
                    other => panic!("socket closed: {other:?}"),
                }
            }
        })
        .await
        .expect("pong in time");
        assert_eq!(reply, json!({ "type": "pong" }));
    }

    #[tokio::test]
    #[serial]
    async fn closing_the_socket_releases_every_topic() {
        let (app, state, _tmp) = make_test_app().await;
        let addr = spawn_server(app).await.to_string();
        let (mut socket, _) = connect_ws(&addr, "realtime", Some(&admin_token()))
            .await
            .unwrap();
        // Topics are attached in order; the last one means all are.
        wait_for_server_subscriber(&state, Topic::ALL[Topic::ALL.len() - 1]).await;
        for topic in Topic::ALL {
            assert_eq!(state.ws().subscriber_count(topic).await, 1, "{topic}");
        }

        socket.close(None).await.unwrap();
        for _ in 0..100 {
            let mut open = 0;
            for topic in Topic::ALL {
                open += state.ws().subscriber_count(topic).await;
            }
            if open == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("topics still held after the socket closed");
    }

    #[tokio::test]
    #[serial]
    async fn events_before_connect_are_lost() {
        let (app, state, _tmp) = make_test_app().await;
        let addr = spawn_server(app).await.to_string();

        util::ws::emit(state.ws(), Topic::Leads, &json!({ "id": 1 })).await;

        let (mut socket, _) = connect_ws(&addr, "realtime", Some(&admin_token()))
            .await
            .unwrap();
        let next = tokio::time::timeout(Duration::from_millis(300), async {
            loop {
                match socket.next().await {
                    Some(Ok(Message::Text(t))) => break t.to_string(),
                    Some(Ok(_)) => continue,
                    _ => break String::new(),
                }
            }
        })
        .await;
        assert!(next.is_err(), "nothing should be replayed, got {next:?}");
    }

    #[tokio::test]
    #[serial]
    async fn payment_reaches_client_feed_and_toasts() {
        let (app, state, _tmp) = make_test_app().await;
        let request = service_request::Model::create(state.db(), sample_service_request())
            .await
            .unwrap();
        let addr = spawn_server(app.clone()).await;

        let recorder = Arc::new(Recorder::default());
        let ctx = RealtimeContext::builder().notifier(recorder.clone()).build();
        let feed = PaiementsFeed::new(&ctx);
        let config = RealtimeConfig::new(format!("ws://{addr}/ws/realtime"), format!("http://{addr}"))
            .with_token(admin_token());
        let channel = WsChannel::new(&config, ctx.clone()).unwrap();
        channel.connect();

        wait_until("client connected", || feed.is_connected()).await;
        wait_for_server_subscriber(&state, Topic::Paiements).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/payments")
                    .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(AxumBody::from(
                        json!({
                            "serviceRequestId": request.id,
                            "amountCents": 12980,
                            "status": "succeeded",
                            "cardLast4": "4242"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        wait_until("payment event", || feed.new_paiements_count() == 1).await;
        let toasts = recorder.0.lock().unwrap().clone();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Nouveau paiement reçu");
        assert_eq!(
            toasts[0].message,
            format!("Réf: {} - Montant: 129,80\u{a0}€", request.reference_number)
        );

        channel.shutdown().await;
        assert!(!ctx.is_connected());
    }

    #[tokio::test]
    #[serial]
    async fn notifications_feed_seeds_and_marks_read_against_server() {
        let (app, state, _tmp) = make_test_app().await;
        let seeded = notification::Model::create(
            state.db(),
            notification::NotificationKind::Contact,
            "Nouveau message de contact",
            "Jean - Délais",
        )
        .await
        .unwrap();
        let addr = spawn_server(app).await;

        let ctx = RealtimeContext::builder()
            .api_client(ApiClient::new(format!("http://{addr}"), Some(admin_token())))
            .build();
        let feed = NotificationsFeed::with_options(&ctx, false);

        wait_until("seeded unread list", || feed.unread_count() == 1).await;
        assert_eq!(feed.unread()[0].id, seeded.id);

        feed.mark_read(seeded.id)
            .expect("api client configured")
            .await
            .unwrap();
        assert_eq!(feed.unread_count(), 0);

        let remaining = notification::Model::find_unread(state.db()).await.unwrap();
        assert!(remaining.is_empty());
    }
}
