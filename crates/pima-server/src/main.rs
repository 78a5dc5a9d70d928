use std::sync::Arc;

use anyhow::{Context, Result};
use pima_config::ServerConfig;
use pima_core::Classifier;
use pima_model::ModelArtifact;
use pima_server::{router, ServerState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    info!("Configuration: {:?}", config);

    let state = Arc::new(init_server_state(&config)?);

    let addr = config.addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Loads the classifier once; the server cannot start without it.
fn init_server_state(config: &ServerConfig) -> Result<ServerState> {
    let artifact = ModelArtifact::load(&config.model_path)
        .with_context(|| format!("cannot start without a classifier ({})", config.model_path.display()))?;

    info!(
        "Loaded {} model '{}' from {}",
        artifact.kind(),
        artifact.display_name(),
        config.model_path.display()
    );
    if let Some(description) = &artifact.description {
        info!("  {}", description);
    }

    let name = artifact.display_name().to_string();
    Ok(ServerState::new(Arc::new(artifact), name))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received, draining connections");
}
