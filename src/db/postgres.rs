//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::retry::connect_with_retry;
use crate::db::{ColumnInfo, DatabaseBackend, DatabaseClient, Row, TabularResult, Value};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow, PgValueFormat, Postgres};
use sqlx::{Column as SqlxColumn, Row as SqlxRow, TypeInfo, ValueRef};
use std::time::{Duration, Instant};

/// How long to wait for the single session to become free.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// NUMERIC sign words.
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// PostgreSQL database client.
///
/// The pool holds a single session, so queries issued concurrently through
/// one client run one after another.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Creates a new PostgresClient from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured server, retrying transient failures.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let pool = connect_with_retry(config, || {
            PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
                .connect(&conn_str)
        })
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
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

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Result<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let type_name = col.type_info().name();
            convert_value(row, i, type_name).map_err(|e| {
                GlanceError::query(format!(
                    "Cannot decode column '{}' of type {type_name}: {e}. \
                     Cast it to TEXT or DOUBLE PRECISION in the query",
                    col.name()
                ))
            })
        })
        .collect()
}

/// Decodes one column by its Postgres type name.
///
/// Character types decode as text; anything else without an arm is an
/// error rather than a silent NULL.
fn convert_value(
    row: &PgRow,
    index: usize,
    type_name: &str,
) -> std::result::Result<Value, BoxDynError> {
    match type_name {
        "BOOL" => decode(row, index, Value::Bool),
        "INT2" => decode(row, index, |v: i16| Value::Int(v.into())),
        "INT4" => decode(row, index, |v: i32| Value::Int(v.into())),
        "INT8" => decode(row, index, Value::Int),
        "FLOAT4" => decode(row, index, |v: f32| Value::Float(v.into())),
        "FLOAT8" => decode(row, index, Value::Float),
        "NUMERIC" => decode_numeric(row, index),
        "BYTEA" => decode(row, index, Value::Bytes),
        _ => decode(row, index, Value::String),
    }
}

fn decode<'r, T>(
    row: &'r PgRow,
    index: usize,
    wrap: impl FnOnce(T) -> Value,
) -> std::result::Result<Value, BoxDynError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    let value = row.try_get::<Option<T>, _>(index)?;
    Ok(value.map_or(Value::Null, wrap))
}

/// NUMERIC has no lossless native form here; it is read as a float.
fn decode_numeric(row: &PgRow, index: usize) -> std::result::Result<Value, BoxDynError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let number = match raw.format() {
        PgValueFormat::Binary => numeric_from_binary(raw.as_bytes()?)?,
        PgValueFormat::Text => raw.as_str()?.parse::<f64>()?,
    };
    Ok(Value::Float(number))
}

/// Parses the binary NUMERIC layout: digit count, weight, sign and display
/// scale as 16-bit words, then base-10000 digit groups. The first group is
/// multiplied by 10000^weight.
fn numeric_from_binary(bytes: &[u8]) -> std::result::Result<f64, BoxDynError> {
    let word = |i: usize| -> std::result::Result<u16, BoxDynError> {
        match bytes.get(i * 2..i * 2 + 2) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err("truncated NUMERIC value".into()),
        }
    };

    let ndigits = usize::from(word(0)?);
    let weight = i32::from(word(1)? as i16);
    let sign = word(2)?;

    match sign {
        NUMERIC_NAN => return Ok(f64::NAN),
        NUMERIC_PINF => return Ok(f64::INFINITY),
        NUMERIC_NINF => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    let mut digits = String::with_capacity(ndigits * 4);
    for i in 0..ndigits {
        digits.push_str(&format!("{:04}", word(4 + i)?));
    }
    if digits.is_empty() {
        return Ok(0.0);
    }

    let minus = if sign == NUMERIC_NEG { "-" } else { "" };
    let exponent = (weight + 1) * 4;
    Ok(format!("{minus}0.{digits}e{exponent}").parse::<f64>()?)
}

/// Formats a query error with the server's detail and hint if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }

        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }

        if let Some(column) = pg_error.column() {
            result.push_str("\n  COLUMN: ");
            result.push_str(column);
        }
    }

    result
}
