//! AI Detector Proxy - entry point.

use std::env;
use std::sync::Arc;

use detector_proxy::logging::{self, mask_key};
use detector_proxy::{app, AppState, Config};
use tokio::net::TcpListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("ai-detector-proxy {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // A missing .env is normal outside development
    let dotenv = dotenvy::dotenv();

    logging::init();

    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {}", e);
    }

    tracing::info!("AI Detector Proxy starting (v{})", VERSION);

    // Load configuration; nothing binds until this succeeds
    let config = Config::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        format!(
            "Failed to load configuration: {}. \
             Set IBM_API_KEY, WATSON_ML_URL and IAM_TOKEN_URL in the environment or a .env file.",
            e
        )
    })?;

    tracing::info!("API key loaded: {}", mask_key(&config.watson.api_key));
    tracing::info!("CORS origins: {}", config.cors_origins.join(", "));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let port = config.server.port;

    let state = Arc::new(AppState::from_config(config));
    let app = app(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Proxy server listening on {}", addr);
    tracing::info!("Token endpoint: http://localhost:{}/api/token", port);
    tracing::info!("Predict endpoint: http://localhost:{}/api/predict", port);
    tracing::info!("Health check: http://localhost:{}/api/health", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Proxy server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
