//! End-to-end tests of FlyerClient over HTTP against a mock service.

use serde_json::json;
use std::time::Duration;

use flyer_client::{CircuitState, FlyerClient, Method, TaskStatus};

mod common;

use common::{closed_port, config_for, MockService, Reply};

#[tokio::test]
async fn test_check_sends_key_and_caches_positive_verdict() {
    let service = MockService::new();
    service.reply("check", Reply::json(json!({"skip": true})));
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "K")).unwrap();

    assert!(client.check_subscription(123, Some("en"), None).await.unwrap());
    assert!(client.check_subscription(123, Some("en"), None).await.unwrap());

    let received = service.received();
    assert_eq!(received.len(), 1, "second check should be served from cache");
    assert_eq!(received[0].method, "check");
    assert_eq!(
        received[0].body,
        json!({"key": "K", "user_id": 123, "language_code": "en"})
    );
    assert_eq!(
        received[0].headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_negative_verdict_rechecked_every_time() {
    let service = MockService::new();
    service.reply("check", Reply::json(json!({"skip": false, "info": "tasks pending"})));
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "K")).unwrap();

    assert!(!client.check_subscription(7, None, None).await.unwrap());
    assert!(!client.check_subscription(7, None, None).await.unwrap());
    assert_eq!(service.request_count(), 2);
}

#[tokio::test]
async fn test_error_envelope_on_non_2xx_is_service_error() {
    let service = MockService::new();
    service.reply("check", Reply::raw(401, r#"{"error": "bad key"}"#));
    service.reply("get_tasks", Reply::raw(401, r#"{"error": "bad key"}"#));
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "wrong")).unwrap();

    let err = client.check_subscription(1, None, None).await.unwrap_err();
    assert_eq!(err.message(), "bad key");
    assert_eq!(err.method, Method::Check);

    let err = client.list_tasks(1, None, None).await.unwrap_err();
    assert_eq!(err.message(), "bad key");

    assert_eq!(client.breaker_state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_malformed_body_fails_open_without_tripping() {
    let service = MockService::new();
    service.reply("check", Reply::raw(502, "<html>Bad Gateway</html>"));
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "K")).unwrap();

    assert!(client.check_subscription(1, None, None).await.unwrap());
    assert!(client.check_subscription(1, None, None).await.unwrap());

    assert_eq!(service.request_count(), 2);
    assert_eq!(client.breaker_state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_connection_refused_opens_breaker() {
    let addr = closed_port();
    let client = FlyerClient::new(config_for(addr, "K")).unwrap();

    assert!(client.check_subscription(123, None, None).await.unwrap());
    assert_eq!(client.breaker_state(), CircuitState::Open);

    // The service comes back, but the breaker keeps calls away for the cooldown.
    let service = MockService::new();
    service.reply("check", Reply::json(json!({"skip": false})));
    service.start_on(addr).await;

    assert!(client.check_subscription(123, None, None).await.unwrap());
    assert!(client.list_tasks(123, None, None).await.unwrap().is_empty());
    assert_eq!(service.request_count(), 0);
}

#[tokio::test]
async fn test_timeout_opens_breaker_and_recheck_is_unknown() {
    let service = MockService::new();
    service.reply(
        "check_task",
        Reply::json(json!({"result": "complete"})).delayed(Duration::from_secs(3)),
    );
    let addr = service.start().await;

    let mut config = config_for(addr, "K");
    config.transport.request_timeout_secs = 1;
    let client = FlyerClient::new(config).unwrap();

    let status = client.recheck_task(5, "sig").await.unwrap();
    assert_eq!(status, None);
    assert_eq!(client.breaker_state(), CircuitState::Open);
}

#[tokio::test]
async fn test_tasks_and_recheck_flow() {
    let service = MockService::new();
    service.reply(
        "get_tasks",
        Reply::json(json!({
            "result": [
                {"task": "subscribe channel", "status": "incomplete", "links": ["https://t.me/chan"], "signature": "s1"},
                {"task": "start bot", "status": "complete", "links": ["https://t.me/other_bot"], "signature": "s2"}
            ]
        })),
    );
    service.reply("check_task", Reply::json(json!({"result": "complete"})));
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "K")).unwrap();

    let tasks = client.list_tasks(42, Some("ru"), Some(5)).await.unwrap();
    let pending: Vec<_> = tasks.iter().filter(|t| t.is_pending()).collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].links, vec!["https://t.me/chan".to_string()]);

    let status = client.recheck_task(42, &pending[0].signature).await.unwrap();
    assert_eq!(status, Some(TaskStatus::Complete));

    let received = service.received();
    assert_eq!(
        received[0].body,
        json!({"key": "K", "user_id": 42, "language_code": "ru", "limit": 5})
    );
    assert_eq!(
        received[1].body,
        json!({"key": "K", "user_id": 42, "signature": "s1"})
    );
}

#[tokio::test]
async fn test_empty_key_never_calls_service() {
    let service = MockService::new();
    let addr = service.start().await;

    let client = FlyerClient::new(config_for(addr, "")).unwrap();

    assert!(client.check_subscription(123, None, None).await.unwrap());
    assert_eq!(client.bot_info().await.unwrap(), None);
    assert_eq!(service.request_count(), 0);
}

#[tokio::test]
async fn test_transport_options_forwarded() {
    let service = MockService::new();
    service.reply("get_me", Reply::json(json!({"result": {"username": "demo_bot"}})));
    let addr = service.start().await;

    let mut config = config_for(addr, "K");
    config.transport.user_agent = Some("demo-bot/2.0".to_string());
    config
        .transport
        .headers
        .insert("x-bot-instance".to_string(), "eu-1".to_string());
    let client = FlyerClient::new(config).unwrap();

    let info = client.bot_info().await.unwrap().unwrap();
    assert_eq!(info.get("username"), Some(&json!("demo_bot")));

    let received = service.received();
    assert_eq!(received[0].method, "get_me");
    assert_eq!(received[0].body, json!({"key": "K"}));
    assert_eq!(received[0].headers.get("user-agent").unwrap(), "demo-bot/2.0");
    assert_eq!(received[0].headers.get("x-bot-instance").unwrap(), "eu-1");
}
