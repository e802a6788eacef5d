//! Server startup and binding
//!
//! Loads the configured sources, builds the router and serves it on the
//! configured host/port.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServerConfig};
use crate::routes::{self, AppState};

/// Server instance that can be started
pub struct Server {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Loaded history and news
    state: AppState,
    /// The built router
    router: Router,
}

impl Server {
    /// Create a new server, loading the sources named in `config`
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let config = Arc::new(config);
        let state = AppState::load(config.clone())?;
        Ok(Self::with_state(state))
    }

    /// Create a server over an already-built state
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = routes::build_router(state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    /// Get the socket address the server will bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = self.config.socket_addr();
        addr.parse()
            .map_err(|e| ConfigError::Invalid(format!("bind address {}: {}", addr, e)))
    }

    /// Get the configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server
    ///
    /// Binds to the configured host/port and serves requests until Ctrl-C.
    /// In-flight requests are drained before returning.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, source = self.state.source, "Server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("shutdown signal received");
                }
            })
            .await?;
        Ok(())
    }

    /// Run the server with a specific listener
    ///
    /// Tests bind to port 0 and pass the listener in.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            %addr,
            source = self.state.source,
            "Server listening"
        );

        axum::serve(listener, self.router).await
    }
}
