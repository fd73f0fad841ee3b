//! Query catalog: the ordered menu of pre-authored analytical queries.
//!
//! The catalog is built once at startup from typed records and is read-only
//! afterwards. Labels are unique and keep their declaration order.

pub mod dialect;
mod entries;

pub use dialect::{DatePart, SqlDialect};

use crate::config::DatasetConfig;
use crate::error::{GlanceError, Result};
use crate::present::wants_chart;
use regex::Regex;

/// Analytical shape implemented by a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Rows ordered by one numeric column, descending, first N.
    TopN,
    /// Top-N after a range predicate on one column and a threshold on another.
    FilteredTopN,
    /// One aggregate row per category value.
    GroupedAggregate,
    /// Grouped aggregate, then ordered and limited.
    GroupedRanked,
    /// Period-over-period growth percentage.
    PeriodGrowth,
    /// Multi-key grouping kept only when a predicate over its aggregates holds.
    GroupedHaving,
    /// Per group, rows matching one predicate divided by rows matching another.
    ConditionalRatio,
}

/// A named, pre-authored query over the seismic dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDefinition {
    label: String,
    sql: String,
    shape: QueryShape,
    row_limit: Option<usize>,
    chartable: bool,
}

impl QueryDefinition {
    /// Creates a definition; the chart flag is derived from the label.
    pub fn new(label: impl Into<String>, shape: QueryShape, sql: impl Into<String>) -> Self {
        let label = label.into();
        let chartable = wants_chart(&label);
        Self {
            label,
            sql: sql.into(),
            shape,
            row_limit: None,
            chartable,
        }
    }

    /// Records the LIMIT the SQL applies.
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn shape(&self) -> QueryShape {
        self.shape
    }

    /// Upper bound on the number of rows, if the query limits them.
    pub fn row_limit(&self) -> Option<usize> {
        self.row_limit
    }

    /// Whether the label suggests an aggregate worth bar-charting.
    pub fn chartable(&self) -> bool {
        self.chartable
    }

    /// The leading menu number of the label ("5. Avg ..." -> 5).
    pub fn number(&self) -> Option<u32> {
        let (prefix, _) = self.label.split_once('.')?;
        prefix.trim().parse().ok()
    }
}

/// Ordered, immutable label -> definition mapping.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<QueryDefinition>,
    table: String,
}

impl Catalog {
    /// Builds a catalog from explicit entries over `table`.
    ///
    /// Fails on duplicate labels or empty SQL.
    pub fn new(table: impl Into<String>, entries: Vec<QueryDefinition>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;

        for (i, entry) in entries.iter().enumerate() {
            if entry.sql.trim().is_empty() {
                return Err(GlanceError::config(format!(
                    "Query '{}' has no SQL",
                    entry.label
                )));
            }
            if entries[..i].iter().any(|e| e.label == entry.label) {
                return Err(GlanceError::config(format!(
                    "Duplicate query label '{}'",
                    entry.label
                )));
            }
        }

        Ok(Self { entries, table })
    }

    /// Builds the standard earthquake analysis menu for `dataset` in `dialect`.
    pub fn standard(dataset: &DatasetConfig, dialect: SqlDialect) -> Result<Self> {
        validate_table_name(&dataset.table)?;
        let entries = entries::standard_entries(&dataset.table, dataset.since_year, dialect);
        Self::new(dataset.table.clone(), entries)
    }

    /// Labels in menu order.
    pub fn list_labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Looks up a definition by its exact label.
    pub fn get(&self, label: &str) -> Result<&QueryDefinition> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .ok_or_else(|| GlanceError::unknown_label(label))
    }

    /// Looks up by exact label, or by the label's leading menu number.
    pub fn resolve(&self, selector: &str) -> Result<&QueryDefinition> {
        let selector = selector.trim();
        if let Ok(found) = self.get(selector) {
            return Ok(found);
        }
        let number: u32 = selector
            .trim_end_matches('.')
            .parse()
            .map_err(|_| GlanceError::unknown_label(selector))?;
        self.entries
            .iter()
            .find(|e| e.number() == Some(number))
            .ok_or_else(|| GlanceError::unknown_label(selector))
    }

    /// Definitions in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dataset table every entry reads from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// SQL for the total-record-count metric.
    pub fn total_count_sql(&self) -> String {
        format!("SELECT COUNT(*) AS total FROM {}", self.table)
    }
}

/// Table names are spliced into SQL, so only plain (optionally schema-qualified)
/// identifiers are accepted.
fn validate_table_name(table: &str) -> Result<()> {
    let pattern = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .map_err(|e| GlanceError::internal(e.to_string()))?;
    if pattern.is_match(table) {
        Ok(())
    } else {
        Err(GlanceError::config(format!(
            "Invalid dataset table name '{table}'"
        )))
    }
}
