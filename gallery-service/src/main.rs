mod dalle;
mod routes;
mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use dalle::OpenAiClient;
use routes::{build_router, AppState, ImageBackend};
use store::PostStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let data_dir = match std::env::var("ARTSHARE_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => match PostStore::default_data_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Failed to resolve data directory: {}", e);
                std::process::exit(1);
            }
        },
    };

    let store = match PostStore::new(&data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open post store at {:?}: {}", data_dir, e);
            std::process::exit(1);
        }
    };
    info!("Post store at {:?}", data_dir);

    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let generator: Arc<dyn ImageBackend> = match OpenAiClient::new(&api_key) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Image generation unavailable: {} (set OPENAI_API_KEY)", e);
            std::process::exit(1);
        }
    };

    let app = build_router(AppState { store, generator });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Gallery service starting on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to install shutdown handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
