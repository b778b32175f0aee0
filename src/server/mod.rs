pub mod handler;
pub mod transport;

use crate::{Config, Error, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use handler::GovDataHandler;

/// Runs the MCP server over stdio until the transport closes or a shutdown
/// signal arrives.
pub struct Server {
    config: Arc<Config>,
    cancellation_token: CancellationToken,
}

impl Server {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting MCP server infrastructure");

        let handler = GovDataHandler::new(Arc::clone(&self.config))?;

        transport::validate_stdio_transport()
            .map_err(|e| Error::Service(format!("Transport validation failed: {e}")))?;

        let shutdown_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            if let Err(e) = wait_for_shutdown_signal().await {
                warn!("Failed to install signal handlers: {e}");
                return;
            }
            shutdown_token.cancel();
        });

        info!("Starting MCP server on stdio transport");

        let grace = std::time::Duration::from_secs(
            self.config.server.graceful_shutdown_timeout_secs,
        );

        let serve = Self::serve(handler);
        tokio::pin!(serve);

        let result = tokio::select! {
            result = &mut serve => result,
            () = self.cancellation_token.cancelled() => {
                info!("Shutdown signal received, stopping MCP server");
                // Give the transport loop a bounded window to drain
                // in-flight calls before forcing shutdown.
                match tokio::time::timeout(grace, &mut serve).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Graceful shutdown timeout exceeded, forcing shutdown");
                        Ok(())
                    }
                }
            }
        };

        info!("MCP server shutdown complete");
        result
    }

    async fn serve(handler: GovDataHandler) -> Result<()> {
        let server = handler
            .serve(stdio())
            .await
            .map_err(|e| Error::Service(format!("Failed to start MCP server: {e}")))?;

        let quit_reason = server
            .waiting()
            .await
            .map_err(|e| Error::Service(format!("MCP server error: {e}")))?;

        info!("MCP server completed with reason: {:?}", quit_reason);
        Ok(())
    }

    /// Request shutdown from another task.
    pub fn shutdown(&self) {
        warn!("Initiating server shutdown");
        self.cancellation_token.cancel();
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, initiating graceful shutdown"),
        _ = sigint.recv() => info!("Received SIGINT, initiating graceful shutdown"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = Server::new(Config::default());
        assert!(!server.is_shutdown_requested());
    }

    #[test]
    fn test_server_shutdown_flag() {
        let server = Server::new(Config::default());
        server.shutdown();
        assert!(server.is_shutdown_requested());
    }
}
