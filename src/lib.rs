pub mod ai;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod math;
pub mod normalize;
pub mod observability;

use std::sync::Arc;

use axum::{http::Request, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ai::gemini::GeminiGenerator;
use crate::ai::{AiDelegate, ProviderError};
use crate::config::AppConfig;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub official_email: Arc<str>,
    pub ai: AiDelegate,
}

impl AppState {
    pub fn new(official_email: impl Into<Arc<str>>, ai: AiDelegate) -> Self {
        Self {
            official_email: official_email.into(),
            ai,
        }
    }

    /// Wires the Gemini-backed delegate from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let generator = GeminiGenerator::new(config.gemini())?;
        let ai = AiDelegate::new(Arc::new(generator), config.generation_options());
        Ok(Self::new(config.official_email.as_str(), ai))
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
