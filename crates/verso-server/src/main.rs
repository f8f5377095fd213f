//! verso-server - REST API server binary.

use std::net::SocketAddr;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use verso_core::{StoreConfig, VersoError};
use verso_server::{create_server, create_server_with_auth, create_store, AppState};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,verso_server=debug"));

    let json = std::env::var("VERSO_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn load_config() -> Result<StoreConfig, VersoError> {
    match std::env::var("VERSO_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration file");
            StoreConfig::from_file(path)?.merge_env()
        }
        Err(_) => StoreConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    // Get configuration from environment
    let host = std::env::var("VERSO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("VERSO_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| VersoError::Configuration(format!("VERSO_PORT: {}", e)))?;
    let require_auth = std::env::var("VERSO_REQUIRE_AUTH").is_ok();

    let config = load_config()?;
    let store = create_store(config)?;
    let state = AppState::new(store);

    // Create server with or without auth
    let app = if require_auth {
        let api_key = std::env::var("VERSO_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            return Err(VersoError::Configuration(
                "VERSO_REQUIRE_AUTH is set but VERSO_API_KEY is empty".to_string(),
            )
            .into());
        }
        info!("Authentication enabled");
        create_server_with_auth(state, api_key)
    } else {
        info!("Authentication disabled");
        create_server(state)
    };

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting verso-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
