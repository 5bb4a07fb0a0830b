use crate::config::Config;
use crate::source::{HttpPlaylistSource, PlaylistSource};
use crate::state::Broadcast;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod routes;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub broadcast: Arc<Broadcast>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(config: Config, source: Arc<dyn PlaylistSource>) -> Self {
        let broadcast = Arc::new(Broadcast::new(&config, source));
        Self {
            broadcast,
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/playlist.m3u8", get(routes::playlist))
        .route("/sources", get(routes::sources))
        .route("/status", get(routes::status))
        .route("/transition", post(routes::transition))
        .route("/stream/begin", post(routes::stream_begin))
        .route("/stream/end", post(routes::stream_end))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Start the HTTP server, fetching upstream playlists over HTTP
pub async fn start_server(config: Config) -> Result<()> {
    let source = Arc::new(HttpPlaylistSource::from_config(&config.upstream));
    start_server_with_source(config, source).await
}

/// Start the HTTP server with a custom playlist source
pub async fn start_server_with_source(
    config: Config,
    source: Arc<dyn PlaylistSource>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    tracing::info!(
        upstream = %config.upstream.playlist_base_url,
        prefix = %config.playlist.segment_prefix,
        "Upstream playlists"
    );

    let ctx = AppContext::new(config, source);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
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
