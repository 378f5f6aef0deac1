//! aicd-engine - AI content detection service
//!
//! **Module Identity:**
//! - Name: aicd-engine
//! - Default port: 5740
//!
//! Serves heuristic image/audio detection over HTTP, fusing hosted image
//! classifiers into image verdicts when they are reachable.

use std::path::PathBuf;

use aicd_common::config::{ConfigResolver, ConfigSource};
use aicd_engine::classifiers::ClassifierChain;
use aicd_engine::AppState;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for aicd-engine
#[derive(Parser, Debug)]
#[command(name = "aicd-engine")]
#[command(about = "AI content detection service")]
#[command(version)]
struct Args {
    /// Configuration file (overrides AICD_CONFIG and the per-user file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "AICD_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AICD_PORT")]
    port: Option<u16>,

    /// Run on heuristics alone, never calling external classifiers
    #[arg(long)]
    no_classifier: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolved = ConfigResolver::new()
        .with_cli_path(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;
    let mut config = resolved.config;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_classifier {
        config.classifier.enabled = false;
    }
    config.validate().context("Invalid configuration")?;

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("aicd_engine={0},aicd_common={0},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_profile = env!("BUILD_PROFILE"),
        built = env!("BUILD_TIMESTAMP"),
        "Starting aicd-engine"
    );
    match &resolved.source {
        ConfigSource::Defaults { missing: Some(path) } => {
            warn!(path = %path.display(), "Config file not found, using compiled defaults")
        }
        source => info!(source = %source, "Configuration loaded"),
    }

    let classifiers =
        ClassifierChain::from_config(&config.classifier).context("Failed to build classifiers")?;
    if classifiers.is_empty() {
        info!("External classifiers disabled, image verdicts use heuristics only");
    } else {
        info!(
            classifiers = ?classifiers.names(),
            token = config.classifier.api_token.is_some(),
            "External classifiers configured"
        );
    }

    let bind = (config.server.host.clone(), config.server.port);
    let app = aicd_engine::build_router(AppState::new(config, classifiers));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .context("Failed to bind to address")?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
