use crate::arr::{RadarrApi, RadarrClient};
use crate::config::Config;
use crate::unmanic::{LibraryCatalogProvider, PendingTaskService, UnmanicClient};
use anyhow::{Context, Result};
use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod error;
pub mod routes_webhook;
pub mod signature;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub radarr: Arc<dyn RadarrApi>,
    pub catalog: Arc<dyn LibraryCatalogProvider>,
    pub tasks: Arc<dyn PendingTaskService>,
}

impl AppContext {
    /// Context backed by real Radarr and Unmanic clients
    pub fn new(config: Config) -> Self {
        let radarr = Arc::new(RadarrClient::new(&config.radarr));
        let unmanic = Arc::new(UnmanicClient::new(&config.unmanic));
        Self {
            config: Arc::new(config),
            radarr,
            catalog: unmanic.clone(),
            tasks: unmanic,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(routes_webhook::webhook_routes())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    if !config.webhook.enabled {
        tracing::warn!("Webhook is disabled; POST /webhook will answer 404");
    }

    let app = create_router(AppContext::new(config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
