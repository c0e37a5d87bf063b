//! Application startup and lifecycle management.

use crate::config::ChatConfig;
use crate::handlers::{generate, health_check, render_metrics};
use crate::services::providers::gemini::{GeminiClient, GeminiConfig};
use crate::services::providers::Upstream;
use crate::services::{Dispatcher, RetryPolicy};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub model: String,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, model: impl Into<String>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            model: model.into(),
            metrics: None,
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .fallback_service(ServeDir::new(static_dir))
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    static_dir: PathBuf,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let gemini = GeminiClient::new(GeminiConfig {
            api_base: config.google.api_base.clone(),
            api_key: config.google.api_key.clone(),
            model: config.model.name.clone(),
        })
        .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
        let upstream: Arc<dyn Upstream> = Arc::new(gemini);

        let policy = RetryPolicy::new(config.retry.max_retries, config.retry.delay());
        tracing::info!(
            model = %config.model.name,
            max_retries = policy.max_retries,
            retry_delay_ms = config.retry.delay_ms,
            "Initialized Gemini dispatcher"
        );

        let state = AppState::new(Dispatcher::new(upstream, policy), config.model.name.clone());

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Chat service listening on http://localhost:{}", port);

        Ok(Self {
            port,
            listener,
            state,
            static_dir: config.static_dir,
        })
    }

    /// Expose `/metrics` through an installed Prometheus recorder.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state.metrics = Some(handle);
        self
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until_stopped<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state, &self.static_dir);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
