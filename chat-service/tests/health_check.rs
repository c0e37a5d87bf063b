//! Integration tests for the ambient endpoints of chat-service.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-service");
    assert_eq!(body["model"], common::TEST_MODEL);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn metrics_disabled_without_recorder() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn serves_chat_ui() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("http://localhost:{}/", app.port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("/app.js"));

    let script = app
        .client
        .get(format!("{}/app.js", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert!(script.status().is_success());
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/generate", app.address),
        )
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
