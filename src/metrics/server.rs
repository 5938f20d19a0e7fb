//! HTTP server for the Prometheus metrics endpoint.

use crate::metrics::MetricsRegistry;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
    /// Path serving the metrics.
    pub telemetry_path: String,
    /// How long in-flight requests may take to finish after shutdown.
    pub shutdown_timeout: Duration,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 9104).into(),
            telemetry_path: "/metrics".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Shared state for the request handlers.
struct AppState {
    registry: MetricsRegistry,
    telemetry_path: String,
}

/// HTTP server for exposing Prometheus metrics.
pub struct MetricsServer {
    config: MetricsServerConfig,
    state: Arc<AppState>,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, registry: MetricsRegistry) -> Self {
        let state = Arc::new(AppState {
            registry,
            telemetry_path: config.telemetry_path.clone(),
        });
        Self { config, state }
    }

    fn router(&self) -> Router {
        Router::new()
            .route(&self.config.telemetry_path, get(metrics_handler))
            .route("/", get(landing_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Starts the HTTP server.
    ///
    /// Runs until `shutdown` is cancelled, then drains in-flight requests
    /// for at most `shutdown_timeout`.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), ServerError> {
        let app = self.router();

        tracing::info!(
            addr = %listener.local_addr()?,
            path = %self.config.telemetry_path,
            "Metrics server listening"
        );

        let graceful = shutdown.clone();
        let mut server = pin!(axum::serve(listener, app)
            .with_graceful_shutdown(async move { graceful.cancelled().await })
            .into_future());

        let result = tokio::select! {
            result = &mut server => result,
            () = shutdown.cancelled() => {
                match tokio::time::timeout(self.config.shutdown_timeout, server).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(
                            timeout = ?self.config.shutdown_timeout,
                            "Open connections did not finish in time, stopping anyway"
                        );
                        Ok(())
                    }
                }
            }
        };
        result.map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("Metrics server stopped");
        Ok(())
    }
}

/// Handler for the telemetry endpoint.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        )
            .into_response(),
    }
}

/// Handler for `/`, linking to the telemetry endpoint.
async fn landing_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(landing_page(&state.telemetry_path))
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn landing_page(telemetry_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Rsyslog exporter</title></head>\n\
         <body>\n\
         <h1>Rsyslog exporter</h1>\n\
         <p><a href='{telemetry_path}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    )
}
