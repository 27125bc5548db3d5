//! FAIR Capture Server
//!
//! Serves the per-field extraction API used by the FAIR data-entry client.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fair_capture::capture::RenderEngine;
use fair_capture::config::Config;
use fair_capture::field::{FieldId, FieldSpec, MergePolicy};
use fair_capture::recognition::{HttpRecognitionClient, RecognitionService};
use fair_capture::routes;
use fair_capture::state::AppState;

/// Certificate-of-conformance numbers on Form 2 are collected as a list
const COC_NUMBERS_FIELD: &str = "coc-numbers";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "fair_capture=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting FAIR Capture Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Recognition service: {}", config.recognition.base_url);
    tracing::info!("JPEG quality: {}", config.capture.jpeg_quality);

    RenderEngine::global().initialize();

    let recognizer = HttpRecognitionClient::new(&config.recognition)
        .context("Failed to initialize recognition client")?;
    if !recognizer.is_available().await {
        tracing::warn!(
            "Recognition service at {} is not reachable yet; captures will fail until it is",
            config.recognition.base_url
        );
    }

    let app_state = AppState::new(config.clone(), Arc::new(recognizer));
    let coc_field: FieldId = COC_NUMBERS_FIELD
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    app_state
        .controllers()
        .configure(coc_field, FieldSpec::multi_value(MergePolicy::Append));

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;
    tracing::info!("FAIR Capture Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
