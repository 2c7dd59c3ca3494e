use std::future::Future;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::api;
use crate::config::Config;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Server wiring
// ---------------------------------------------------------------------------

/// Load the dataset, bind the configured address and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::load(&config);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("reading listener address")?;
    log::info!("Climate analyzer API listening on http://{addr}");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("serving HTTP")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
