//! Output formatting for headless mode.
//!
//! Renders a [`RenderInstruction`], the menu, or the total-count metric as
//! plain text or JSON on stdout.

use crate::db::TabularResult;
use crate::present::{ChartHint, RenderInstruction};
use serde::Serialize;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonResult<'a> {
    label: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<Vec<serde_json::Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<&'a ChartHint>,
}

/// Formats headless results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of running the query named `label`.
    pub fn format_instruction(&self, label: &str, instruction: &RenderInstruction) -> String {
        match self.format {
            OutputFormat::Text => format_text(label, instruction),
            OutputFormat::Json => format_json(label, instruction),
        }
    }

    /// Formats the menu.
    pub fn format_labels(&self, labels: &[&str]) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut out = labels.join("\n");
                out.push('\n');
                out
            }
            OutputFormat::Json => to_json_line(&labels),
        }
    }

    /// Formats the total-count metric.
    pub fn format_total(&self, total: i64) -> String {
        match self.format {
            OutputFormat::Text => format!("Total Records: {total}\n"),
            OutputFormat::Json => to_json_line(&serde_json::json!({ "total": total })),
        }
    }
}

fn format_text(label: &str, instruction: &RenderInstruction) -> String {
    let body = match instruction {
        RenderInstruction::ShowTable { result, .. } => format!(
            "{}({} {} in {}ms)\n",
            render_table(result),
            result.row_count,
            if result.row_count == 1 { "row" } else { "rows" },
            result.execution_time.as_millis()
        ),
        other => format!("{}\n", other.message().unwrap_or_default()),
    };
    format!("{label}\n\n{body}")
}

fn format_json(label: &str, instruction: &RenderInstruction) -> String {
    let output = match instruction {
        RenderInstruction::ShowTable { result, chart } => JsonResult {
            label,
            status: "ok",
            message: None,
            columns: Some(result.column_names()),
            rows: Some(
                result
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|v| v.to_json()).collect())
                    .collect(),
            ),
            row_count: Some(result.row_count),
            execution_time_ms: Some(result.execution_time.as_millis() as u64),
            chart: chart.as_ref(),
        },
        other => JsonResult {
            label,
            status: if other.is_error() { "error" } else { "empty" },
            message: other.message(),
            columns: None,
            rows: None,
            row_count: None,
            execution_time_ms: None,
            chart: None,
        },
    };
    to_json_line(&output)
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    let mut out = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize output: {e}"}}"#));
    out.push('\n');
    out
}

/// Renders a result as an aligned text table with a header rule.
pub fn render_table(result: &TabularResult) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(result.column_names()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
