//! Connection provider: connect once, reuse for the process lifetime.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::ConnectionConfig;
use crate::db::DatabaseClient;
use crate::error::{GlanceError, Result};

/// The shared database session handed to every query.
pub type ConnectionHandle = Arc<dyn DatabaseClient>;

/// Opens a client for a connection config.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>>;
}

/// Connects with the backend named in the config.
pub struct BackendConnector;

#[async_trait]
impl Connector for BackendConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
        crate::db::connect(config).await
    }
}

/// Lazily opens and then memoizes a single database connection.
///
/// The first `get_connection` call performs the network/auth I/O; every later
/// call returns the same handle. A failed connect is not memoized, so the next
/// interaction tries again. Concurrent first calls share one connect.
pub struct ConnectionProvider {
    config: Option<ConnectionConfig>,
    connector: Box<dyn Connector>,
    handle: OnceCell<ConnectionHandle>,
}

impl ConnectionProvider {
    /// Creates a provider that will connect using `config` on first use.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(config, BackendConnector)
    }

    /// Like [`ConnectionProvider::new`], opening the client through `connector`.
    pub fn with_connector(config: ConnectionConfig, connector: impl Connector + 'static) -> Self {
        Self {
            config: Some(config),
            connector: Box::new(connector),
            handle: OnceCell::new(),
        }
    }

    /// Creates a provider with no endpoint; every request fails with a connection error.
    pub fn unconfigured() -> Self {
        Self {
            config: None,
            connector: Box::new(BackendConnector),
            handle: OnceCell::new(),
        }
    }

    /// Creates a provider around an already-open client.
    pub fn with_client(client: ConnectionHandle) -> Self {
        Self {
            config: None,
            connector: Box::new(BackendConnector),
            handle: OnceCell::new_with(Some(client)),
        }
    }

    /// Returns the shared handle, connecting on the first call.
    pub async fn get_connection(&self) -> Result<ConnectionHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let config = self.config.as_ref().ok_or_else(|| {
                    GlanceError::connection(
                        "No database connection configured. Pass a connection URL or set DATABASE_URL.",
                    )
                })?;
                info!("Connecting to {}", config.display_string());
                let client = self.connector.connect(config).await?;
                Ok::<ConnectionHandle, GlanceError>(Arc::from(client))
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Check if the handle has been opened.
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Display-safe description of the configured endpoint.
    pub fn display_string(&self) -> Option<String> {
        self.config.as_ref().map(ConnectionConfig::display_string)
    }

    /// Closes the handle if one was opened.
    ///
    /// Called once at shutdown; queries issued afterwards fail.
    pub async fn close(&self) -> Result<()> {
        if let Some(handle) = self.handle.get() {
            handle.close().await?;
        }
        Ok(())
    }
}
