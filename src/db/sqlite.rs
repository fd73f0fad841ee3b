//! SQLite database client implementation.
//!
//! Used for local dataset files and for the in-memory fixtures the test suite
//! runs the query catalog against.

use crate::config::ConnectionConfig;
use crate::db::{ColumnInfo, DatabaseBackend, DatabaseClient, Row, TabularResult, Value};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

/// Path value that selects an in-memory database.
const MEMORY_PATH: &str = ":memory:";

/// SQLite database client.
///
/// Holds a single connection that never idles out, which keeps in-memory
/// databases alive for the lifetime of the client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Creates a new SqliteClient from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens the configured database file (read-only) or an in-memory database.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let path = config
            .path
            .as_deref()
            .ok_or_else(|| GlanceError::connection("SQLite database path is required"))?;

        let options = if path == MEMORY_PATH {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| GlanceError::connection(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(path).read_only(true)
        };

        let pool = Self::single_connection_pool()
            .connect_with(options)
            .await
            .map_err(|e| GlanceError::connection(format!("Cannot open SQLite database '{path}': {e}")))?;

        debug!("Opened SQLite database {}", path);
        Ok(Self { pool })
    }

    /// Opens a fresh, writable in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| GlanceError::connection(e.to_string()))?;
        let pool = Self::single_connection_pool()
            .connect_with(options)
            .await
            .map_err(|e| GlanceError::connection(e.to_string()))?;
        Ok(Self { pool })
    }

    fn single_connection_pool() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn execute_query(&self, sql: &str) -> Result<TabularResult> {
        let start = Instant::now();

        let result = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GlanceError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|first_row| {
                first_row
                    .columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = result.iter().map(convert_row).collect();

        Ok(TabularResult::with_data(columns, rows)?.with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single value using its storage class.
///
/// SQLite columns produced by expressions carry no declared type, so the
/// runtime type of each value decides how it is decoded.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" | "INT" | "INT8" | "BIGINT" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "BOOLEAN" => row
            .try_get_unchecked::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => format!("ERROR: {}", db_error.message()),
        None => error.to_string(),
    }
}
