#![allow(dead_code)]

use chat_service::config::{ChatConfig, GoogleConfig, ModelConfig, RetrySettings};
use chat_service::startup::Application;
use secrecy::Secret;
use std::path::PathBuf;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "models/gemini-2.5-flash";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upstream: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Default retry budget with no wait between attempts.
    pub async fn spawn() -> Self {
        Self::spawn_with_retries(2).await
    }

    pub async fn spawn_with_retries(max_retries: u32) -> Self {
        let upstream = MockServer::start().await;

        let config = ChatConfig {
            common: service_core::config::Config { port: 0 },
            google: GoogleConfig {
                api_key: Secret::new(TEST_API_KEY.to_string()),
                api_base: upstream.uri(),
            },
            model: ModelConfig {
                name: TEST_MODEL.to_string(),
            },
            retry: RetrySettings {
                max_retries,
                delay_ms: 0,
            },
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped(std::future::pending()).await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self {
            address,
            port,
            upstream,
            client,
        }
    }

    pub async fn post_generate(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/generate", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn outbound_calls(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

pub fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
