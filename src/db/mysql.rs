//! MySQL and MariaDB database client implementation.

use crate::config::ConnectionConfig;
use crate::db::retry::connect_with_retry;
use crate::db::{ColumnInfo, DatabaseBackend, DatabaseClient, Row, TabularResult, Value};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use sqlx::error::BoxDynError;
use sqlx::mysql::{MySql, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo};
use std::time::{Duration, Instant};

/// How long to wait for the single session to become free.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// MySQL database client.
///
/// Like the PostgreSQL client, it holds one session.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured server, retrying transient failures.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let pool = connect_with_retry(config, || {
            MySqlPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
                .connect(&conn_str)
        })
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Mysql
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

        let rows = result.iter().map(convert_row).collect::<Result<Vec<Row>>>()?;

        Ok(TabularResult::with_data(columns, rows)?.with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn convert_row(row: &MySqlRow) -> Result<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let type_name = col.type_info().name();
            convert_value(row, i, type_name).map_err(|e| {
                GlanceError::query(format!(
                    "Cannot decode column '{}' of type {type_name}: {e}. \
                     Cast it to CHAR or DOUBLE in the query",
                    col.name()
                ))
            })
        })
        .collect()
}

/// Decodes one column by its MySQL type name.
///
/// DECIMAL (what SUM and AVG return) arrives as text and is read as a float.
fn convert_value(
    row: &MySqlRow,
    index: usize,
    type_name: &str,
) -> std::result::Result<Value, BoxDynError> {
    match type_name {
        "BOOLEAN" => decode(row, index, Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => decode(row, index, Value::Int),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => match row.try_get::<Option<u64>, _>(index)? {
            Some(v) => Ok(Value::Int(i64::try_from(v)?)),
            None => Ok(Value::Null),
        },
        "FLOAT" => decode(row, index, |v: f32| Value::Float(v.into())),
        "DOUBLE" => decode(row, index, Value::Float),
        "DECIMAL" => match row.try_get_unchecked::<Option<String>, _>(index)? {
            Some(text) => Ok(Value::Float(text.parse::<f64>()?)),
            None => Ok(Value::Null),
        },
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            decode(row, index, Value::Bytes)
        }
        _ => decode(row, index, Value::String),
    }
}

fn decode<'r, T>(
    row: &'r MySqlRow,
    index: usize,
    wrap: impl FnOnce(T) -> Value,
) -> std::result::Result<Value, BoxDynError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    let value = row.try_get::<Option<T>, _>(index)?;
    Ok(value.map_or(Value::Null, wrap))
}

/// Formats a query error with the server's SQLSTATE if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    match db_error.code() {
        Some(code) => format!("ERROR: {} (SQLSTATE {code})", db_error.message()),
        None => format!("ERROR: {}", db_error.message()),
    }
}
