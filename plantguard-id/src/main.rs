//! plantguard-id - Plant identification service
//!
//! Accepts plant photos over HTTP, ranks species/genus/family candidates
//! and, when a location is supplied, asks a remote text-generation service
//! whether the top species is invasive there.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use plantguard_id::services::{
    GeminiTransport, IdentificationOrchestrator, InvasiveVerifier, ScoringClassifier,
};
use plantguard_id::{build_router, AppState};

/// Command-line arguments for plantguard-id
#[derive(Parser, Debug)]
#[command(name = "plantguard-id")]
#[command(about = "Plant identification service with invasive-species verification")]
#[command(version)]
struct Args {
    /// Bootstrap TOML config file (falls back to $PLANTGUARD_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind (overrides TOML)
    #[arg(long, env = "PLANTGUARD_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides TOML)
    #[arg(short, long, env = "PLANTGUARD_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = plantguard_common::config::load_bootstrap(args.config.as_deref())
        .context("Failed to load configuration")?;
    let toml_config = loaded.config;

    plantguard_common::logging::init_tracing(&toml_config.logging.level)
        .context("Failed to initialize logging")?;

    info!("Starting plantguard-id");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match &loaded.source {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: built-in defaults"),
    }

    // Verifier first: a missing API key must stop startup
    let settings = plantguard_id::config::verifier_settings(&toml_config)
        .context("Failed to configure invasive-species verifier")?;
    let transport = GeminiTransport::new(&settings)
        .context("Failed to build verification HTTP client")?;
    let verifier = Arc::new(InvasiveVerifier::new(Box::new(transport)));
    info!(
        model = %settings.model,
        timeout_secs = settings.timeout.as_secs(),
        "Invasive-species verifier ready"
    );

    let classifier = ScoringClassifier::from_config(&toml_config.classifier)
        .context("Failed to initialize classifier")?;
    if !plantguard_id::services::Classifier::is_ready(&classifier) {
        warn!("No scoring backend configured; identification requests will report 'model not ready'");
    }

    let orchestrator = Arc::new(IdentificationOrchestrator::new(
        Arc::new(classifier),
        Arc::clone(&verifier),
    ));

    let state = AppState::new(orchestrator).with_max_upload_bytes(toml_config.max_upload_bytes);
    let app = build_router(state);

    let host = args.host.unwrap_or(toml_config.host);
    let port = args.port.unwrap_or(toml_config.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Router and handlers are gone; this should be the last reference
    match Arc::try_unwrap(verifier) {
        Ok(verifier) => verifier.close(),
        Err(_) => warn!("Verifier still referenced at shutdown; connection pool released on exit"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
