use anyhow::Result;
use face_gate::{api, config::ServiceConfig, recognition::lbph::LbphEngine, telemetry, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting face-gate...");

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;
    info!(
        "face-gate configuration: bind={}, cascade={}, model={}",
        config.bind_addr, config.cascade_path, config.model_path
    );

    // Load both models before binding; a broken engine must never serve.
    let engine = match LbphEngine::load(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("model loading failed, refusing to start: {e:#}");
            return Err(e);
        }
    };

    let state = AppState::new(Arc::new(engine));

    // Build HTTP router
    let app = api::router(state);

    // Bind and serve
    info!("Binding to {}", config.bind_addr);
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("face-gate listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
