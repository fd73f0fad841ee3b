//! Query execution with outcome classification.
//!
//! Every database failure is caught here and turned into an
//! [`ExecutionOutcome`]; nothing below this boundary reaches the caller as an
//! error.

use std::time::Instant;

use tracing::{debug, warn};

use crate::catalog::QueryDefinition;
use crate::connection::ConnectionProvider;
use crate::db::TabularResult;
use crate::error::GlanceError;
use crate::safety::{classify_sql, Access};

/// Runs SQL through the provider's shared handle.
pub struct QueryExecutor<'a> {
    provider: &'a ConnectionProvider,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(provider: &'a ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Executes a catalog entry.
    pub async fn execute(&self, definition: &QueryDefinition) -> ExecutionOutcome {
        debug!("Running '{}'", definition.label());
        self.execute_sql(definition.sql()).await
    }

    /// Executes arbitrary SQL, refusing statements that write or do not parse.
    pub async fn execute_sql(&self, sql: &str) -> ExecutionOutcome {
        let db = match self.provider.get_connection().await {
            Ok(db) => db,
            Err(e) => return ExecutionOutcome::from_error(e),
        };

        match classify_sql(db.backend(), sql) {
            Access::ReadOnly => {}
            Access::Writes(kind) => {
                warn!("Refused {} statement", kind);
                return ExecutionOutcome::failure(
                    FailureKind::QueryExecution,
                    format!("Refusing to run {kind}: the dataset is read-only"),
                );
            }
            Access::Unparsed(reason) => {
                warn!("Refused SQL that did not parse: {}", reason);
                return ExecutionOutcome::failure(
                    FailureKind::QueryExecution,
                    format!("Refusing to run SQL that could not be parsed: {reason}"),
                );
            }
        }

        let start = Instant::now();
        let result = db.execute_query(sql).await;
        let elapsed = start.elapsed();

        match result {
            Ok(result) if result.is_empty() => {
                debug!("Query returned no rows ({:?})", elapsed);
                ExecutionOutcome::Empty
            }
            Ok(result) => {
                debug!("Query returned {} rows ({:?})", result.row_count, elapsed);
                ExecutionOutcome::Success(result)
            }
            Err(e) => {
                warn!("Query failed after {:?}: {}", elapsed, e);
                ExecutionOutcome::from_error(e)
            }
        }
    }
}

/// Why an execution attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The database could not be reached or refused the credentials.
    Connection,
    /// The statement was rejected or failed while running.
    QueryExecution,
}

/// Result of one execution attempt. Exactly one variant per attempt.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The query ran and returned at least one row.
    Success(TabularResult),
    /// The query ran and matched nothing.
    Empty,
    /// The query could not run; `message` is the original diagnostic.
    Failure { kind: FailureKind, message: String },
}

impl ExecutionOutcome {
    /// Creates a failure outcome.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Converts an error raised below the executor into an outcome.
    pub fn from_error(error: GlanceError) -> Self {
        match error {
            GlanceError::Connection(message) => Self::failure(FailureKind::Connection, message),
            GlanceError::Query(message) => Self::failure(FailureKind::QueryExecution, message),
            other => Self::failure(FailureKind::QueryExecution, other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Turns the outcome back into a `Result` for callers that need the data.
    ///
    /// `Empty` becomes `Ok(None)`.
    pub fn into_result(self) -> crate::error::Result<Option<TabularResult>> {
        match self {
            Self::Success(result) => Ok(Some(result)),
            Self::Empty => Ok(None),
            Self::Failure {
                kind: FailureKind::Connection,
                message,
            } => Err(GlanceError::connection(message)),
            Self::Failure {
                kind: FailureKind::QueryExecution,
                message,
            } => Err(GlanceError::query(message)),
        }
    }
}
