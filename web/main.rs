mod config;
mod pair;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use clap::Parser;
use config::{Config, CorsPolicy};
use maskpair::database::{self, Database};
use serde::Serialize;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Builds the router with every route, the request tracing layer and the chosen CORS policy.
pub fn app(state: AppState, cors: CorsPolicy) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/upload-pair", post(pair::upload_pair))
        .route("/api/image-pairs", get(pair::get_pairs))
        .route(
            "/api/image-pair/{pair_id}",
            get(pair::get_pair).delete(pair::delete_pair),
        )
        // Uploads are not size limited.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors.layer() {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness only; storage is not consulted.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to open database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!(database_url = %config.database_url, cors = ?config.cors, "starting");

    let db = Database::with_migration(database::connect(&config.database_url).await?).await?;

    let state = AppState { db: Arc::new(db) };

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state, config.cors))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
