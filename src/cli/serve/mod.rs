//! Serve command - runs the HTTP API and the static UI on one port

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::observability::init_metrics;

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let metrics = init_metrics(&config.metrics);
    let state = crate::create_app_state(&config).await?;

    if state.registry().is_empty() {
        warn!("No models registered; generation requests will fail until models are added");
    }

    let app = create_router(state, &config, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting Question Forge on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(build_socket_addr(&config).unwrap().to_string(), "0.0.0.0:8000");

        let mut bad = AppConfig::default();
        bad.server.host = "not-an-ip".to_string();
        assert!(build_socket_addr(&bad).is_err());
    }
}
