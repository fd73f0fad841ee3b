//! Backend-specific SQL fragments used by catalog entries.
//!
//! Calendar extraction and casts differ between PostgreSQL, MySQL and SQLite;
//! the rest of the catalog SQL is portable.

use crate::db::DatabaseBackend;

/// A calendar field extracted from the event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    /// Day of week, 0 = Sunday.
    DayOfWeek,
    Hour,
}

/// Renders the non-portable pieces of catalog SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDialect {
    backend: DatabaseBackend,
}

impl SqlDialect {
    pub fn new(backend: DatabaseBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// Integer-valued calendar field of `column`.
    pub fn date_part(&self, part: DatePart, column: &str) -> String {
        match self.backend {
            DatabaseBackend::Postgres => {
                let field = match part {
                    DatePart::Year => "YEAR",
                    DatePart::Month => "MONTH",
                    DatePart::DayOfWeek => "DOW",
                    DatePart::Hour => "HOUR",
                };
                format!("CAST(EXTRACT({field} FROM {column}) AS INTEGER)")
            }
            DatabaseBackend::Mysql => match part {
                DatePart::Year => format!("YEAR({column})"),
                DatePart::Month => format!("MONTH({column})"),
                // DAYOFWEEK counts from 1 = Sunday
                DatePart::DayOfWeek => format!("(DAYOFWEEK({column}) - 1)"),
                DatePart::Hour => format!("HOUR({column})"),
            },
            DatabaseBackend::Sqlite => {
                let format = match part {
                    DatePart::Year => "%Y",
                    DatePart::Month => "%m",
                    DatePart::DayOfWeek => "%w",
                    DatePart::Hour => "%H",
                };
                format!("CAST(strftime('{format}', {column}) AS INTEGER)")
            }
        }
    }

    /// `expr` as a double precision float.
    pub fn as_float(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::Mysql => format!("CAST({expr} AS DOUBLE)"),
            DatabaseBackend::Postgres | DatabaseBackend::Sqlite => {
                format!("CAST({expr} AS DOUBLE PRECISION)")
            }
        }
    }

    /// `expr` rendered as text, so timestamps come back in one portable form.
    pub fn as_text(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::Mysql => format!("CAST({expr} AS CHAR)"),
            DatabaseBackend::Postgres | DatabaseBackend::Sqlite => format!("CAST({expr} AS TEXT)"),
        }
    }

    /// `numerator / denominator` as a float, NULL when the denominator is zero.
    pub fn guarded_ratio(&self, numerator: &str, denominator: &str) -> String {
        format!("{} / NULLIF({denominator}, 0)", self.as_float(numerator))
    }
}

/// Number of rows in the group satisfying `predicate`.
pub fn count_where(predicate: &str) -> String {
    format!("SUM(CASE WHEN {predicate} THEN 1 ELSE 0 END)")
}
