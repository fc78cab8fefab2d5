// src/server.rs
use axum::Router;
use tokio::net::TcpListener;

use crate::{config::Config, routes, state::SharedState};

pub fn create_app(state: SharedState, config: &Config) -> anyhow::Result<Router> {
    Ok(routes::create_router()
        .with_state(state)
        .layer(routes::cors_layer(&config.frontend_url)?))
}

/// Serve until Ctrl-C or SIGTERM, then drain in-flight requests.
pub async fn serve(state: SharedState, config: &Config) -> anyhow::Result<()> {
    let app = create_app(state, config)?;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("🚀 Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
