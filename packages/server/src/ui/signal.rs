//! Graceful shutdown signal.

/// Resolve when the process receives ctrl-c.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
        return;
    }
    tracing::info!("shutdown signal received");
}
