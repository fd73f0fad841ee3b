//! Dashboard context for quake-glance.
//!
//! Owns the connection provider and the query catalog for the lifetime of the
//! process. Frontends only talk to [`Dashboard`].

use crate::catalog::{Catalog, QueryDefinition, SqlDialect};
use crate::config::{ConnectionConfig, DatasetConfig};
use crate::connection::{ConnectionHandle, ConnectionProvider};
use crate::error::{GlanceError, Result};
use crate::present::{present, RenderInstruction};
use crate::query::{ExecutionOutcome, QueryExecutor};
use tracing::{debug, info};

/// Application-lifetime context: one provider, one catalog.
pub struct Dashboard {
    provider: ConnectionProvider,
    catalog: Catalog,
}

impl Dashboard {
    /// Creates a dashboard that connects lazily using `connection`.
    ///
    /// Fails fast when no endpoint is configured.
    pub fn connect(connection: Option<ConnectionConfig>, dataset: &DatasetConfig) -> Result<Self> {
        let connection = connection.ok_or_else(|| {
            GlanceError::connection(
                "No database connection configured. Pass a connection URL or set DATABASE_URL.",
            )
        })?;
        let catalog = Catalog::standard(dataset, SqlDialect::new(connection.backend))?;
        info!(
            "Dashboard ready with {} queries over '{}'",
            catalog.len(),
            catalog.table()
        );
        Ok(Self {
            provider: ConnectionProvider::new(connection),
            catalog,
        })
    }

    /// Creates a dashboard around an already-open client.
    pub fn with_client(client: ConnectionHandle, dataset: &DatasetConfig) -> Result<Self> {
        let catalog = Catalog::standard(dataset, SqlDialect::new(client.backend()))?;
        Ok(Self {
            provider: ConnectionProvider::with_client(client),
            catalog,
        })
    }

    /// Creates a dashboard from explicit parts.
    pub fn from_parts(provider: ConnectionProvider, catalog: Catalog) -> Self {
        Self { provider, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Menu labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.catalog.list_labels()
    }

    /// Returns an executor bound to this dashboard's connection.
    pub fn executor(&self) -> QueryExecutor<'_> {
        QueryExecutor::new(&self.provider)
    }

    /// Runs the query behind `label` and decides how to show it.
    ///
    /// Only an unknown label is an `Err`; database problems come back as
    /// [`RenderInstruction::ShowError`].
    pub async fn run(&self, label: &str) -> Result<RenderInstruction> {
        let definition = self.catalog.get(label)?;
        Ok(self.run_definition(definition).await)
    }

    /// Like [`Dashboard::run`], but accepts a menu number as well as a label.
    pub async fn run_selector(&self, selector: &str) -> Result<RenderInstruction> {
        let definition = self.catalog.resolve(selector)?;
        Ok(self.run_definition(definition).await)
    }

    /// Runs a definition and decides how to show it.
    pub async fn run_definition(&self, definition: &QueryDefinition) -> RenderInstruction {
        let outcome = self.executor().execute(definition).await;
        present(outcome, definition.label())
    }

    /// Number of records in the dataset table.
    pub async fn total_count(&self) -> Result<i64> {
        let outcome = self
            .executor()
            .execute_sql(&self.catalog.total_count_sql())
            .await;

        let Some(result) = outcome.into_result()? else {
            return Ok(0);
        };
        let total = result
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(|v| v.as_i64())
            .ok_or_else(|| GlanceError::query("Total count query returned no number"))?;
        debug!("Total records: {}", total);
        Ok(total)
    }

    /// Runs raw read-only SQL through the shared connection.
    pub async fn execute_sql(&self, sql: &str) -> ExecutionOutcome {
        self.executor().execute_sql(sql).await
    }

    /// Display string for the configured connection, if any.
    pub fn connection_info(&self) -> String {
        self.provider
            .display_string()
            .unwrap_or_else(|| "connected".to_string())
    }

    /// Releases the shared connection.
    pub async fn close(&self) -> Result<()> {
        self.provider.close().await
    }
}
