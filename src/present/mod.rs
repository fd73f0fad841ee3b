//! Maps execution outcomes to what a frontend should draw.
//!
//! Pure functions only; the TUI and headless output both consume
//! [`RenderInstruction`].

use crate::db::{TabularResult, Value};
use crate::query::{ExecutionOutcome, FailureKind};
use serde::Serialize;

/// Notice shown when a query matches nothing.
pub const EMPTY_NOTICE: &str = "No data found for this specific criteria.";

/// Whether a label names an aggregate worth charting.
///
/// True iff the label contains "avg" or "count", ignoring case.
pub fn wants_chart(label: &str) -> bool {
    let label = label.to_lowercase();
    label.contains("avg") || label.contains("count")
}

/// How to draw a result as a bar chart: first column as categories, the
/// remaining numeric columns as series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHint {
    pub category_column: String,
    pub series_columns: Vec<String>,
}

impl ChartHint {
    /// Derives a hint from the shape of `result`.
    ///
    /// Returns `None` for results with no columns.
    pub fn for_result(result: &TabularResult) -> Option<Self> {
        let (category, rest) = result.columns.split_first()?;
        let series_columns = rest
            .iter()
            .enumerate()
            .filter(|(i, _)| is_numeric_column(result, i + 1))
            .map(|(_, c)| c.name.clone())
            .collect();

        Some(Self {
            category_column: category.name.clone(),
            series_columns,
        })
    }

    /// One entry per row: the category label and each series' value.
    /// Rows where every series is NULL are skipped.
    pub fn groups(&self, result: &TabularResult) -> Vec<(String, Vec<Option<f64>>)> {
        let Some(category) = result.column_index(&self.category_column) else {
            return Vec::new();
        };
        let series: Vec<Option<usize>> = self
            .series_columns
            .iter()
            .map(|name| result.column_index(name))
            .collect();

        result
            .rows
            .iter()
            .filter_map(|row| {
                let values: Vec<Option<f64>> = series
                    .iter()
                    .map(|index| index.and_then(|i| row.get(i)).and_then(Value::as_f64))
                    .collect();
                if values.iter().all(Option::is_none) {
                    return None;
                }
                let label = row.get(category).map(Value::to_display_string)?;
                Some((label, values))
            })
            .collect()
    }
}

/// Column `index` holds at least one number and nothing but numbers or NULL.
fn is_numeric_column(result: &TabularResult, index: usize) -> bool {
    let mut any = false;
    for row in &result.rows {
        match row.get(index) {
            Some(v) if v.is_numeric() => any = true,
            Some(v) if v.is_null() => {}
            _ => return false,
        }
    }
    any
}

/// What a frontend should draw for one query attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// Table of the result, with a bar chart when `chart` is set.
    ShowTable {
        result: TabularResult,
        chart: Option<ChartHint>,
    },
    /// Informational "no data" notice.
    ShowEmptyNotice,
    /// Inline error; holds the original diagnostic.
    ShowError(String),
}

impl RenderInstruction {
    /// The user-facing notice for non-table instructions.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::ShowTable { .. } => None,
            Self::ShowEmptyNotice => Some(EMPTY_NOTICE.to_string()),
            Self::ShowError(message) => Some(format!("Error executing query: {message}")),
        }
    }

    pub fn result(&self) -> Option<&TabularResult> {
        match self {
            Self::ShowTable { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartHint> {
        match self {
            Self::ShowTable { chart, .. } => chart.as_ref(),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ShowError(_))
    }
}

/// Decides how to show `outcome` for the query named `label`.
pub fn present(outcome: ExecutionOutcome, label: &str) -> RenderInstruction {
    match outcome {
        ExecutionOutcome::Success(result) => {
            let chart = if wants_chart(label) {
                ChartHint::for_result(&result)
            } else {
                None
            };
            RenderInstruction::ShowTable { result, chart }
        }
        ExecutionOutcome::Empty => RenderInstruction::ShowEmptyNotice,
        ExecutionOutcome::Failure { kind, message } => {
            if kind == FailureKind::Connection {
                RenderInstruction::ShowError(format!("could not connect: {message}"))
            } else {
                RenderInstruction::ShowError(message)
            }
        }
    }
}
