//! Server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use super::config::ServerConfig;
use super::handlers::create_router;
use super::state::AppState;
use crate::error::{Result, ShieldError};

/// Folio Shield HTTP server
#[derive(Debug, Clone)]
pub struct ShieldServer {
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ShieldServer {
    /// Create a server with fresh state
    pub fn new(config: ServerConfig) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Create a server around existing state
    pub fn with_state(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state, shutdown_tx }
    }

    /// Shared state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for the server
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Bind the configured address and serve until [`shutdown`](Self::shutdown).
    pub async fn run(&self) -> Result<()> {
        let addr = self.state.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ShieldError::Server(format!("Failed to bind to {addr}: {e}")))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until [`shutdown`](Self::shutdown).
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local = listener.local_addr()?;
        let config = &self.state.config;

        tracing::info!("Folio Shield listening on http://{}", local);
        tracing::info!(
            "Detection: {}, store capacity: {}",
            if config.detection_enabled { "on" } else { "off" },
            self.state.store.capacity()
        );
        tracing::info!("Chat backend: {}", self.state.chat.backend_name());

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .map_err(|e| ShieldError::Server(format!("HTTP server error: {e}")))?;

        tracing::info!("Folio Shield stopped");
        Ok(())
    }

    /// Send shutdown signal
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let server = ShieldServer::new(ServerConfig::default().without_logging());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let running = server.clone();
        let task = tokio::spawn(async move { running.serve(listener).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        server.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
