use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

mod api;
mod config;
mod error;
mod extraction;

use crate::config::StaticConfig;
use crate::extraction::ocr::OcrEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_logging();

    info!(
        "Starting Palimpsest service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration (server binding, CORS origin, OCR model location)
    let config = StaticConfig::load()?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    // OCR models load once at startup; requests share the engine read-only
    let recognizer = Arc::new(OcrEngine::new(&config.ocr)?);
    info!("OCR engine ready");

    // Build the router
    let app = api::router(recognizer, &config)?;

    // Start the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("palimpsest_service=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
