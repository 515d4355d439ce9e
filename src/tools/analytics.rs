//! Analysis and visualization tools over loaded datasets.

use super::base::{optional_str, optional_usize, required_str, BaseTool};
use super::dataset::DatasetRegistry;
use crate::error::{FellowshipError, Result};
use crate::frame::{parse_number, ColumnKind, Dataset};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

const BAR_WIDTH: usize = 40;
const MAX_BARS: usize = 50;
const DEFAULT_BINS: usize = 10;
const MAX_BINS: usize = 100;
const BLANK_GROUP: &str = "(blank)";

/// Statistic computed by [`AnalyzeTool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Describe,
    Count,
    Sum,
    Mean,
    Min,
    Max,
    ValueCounts,
}

impl Operation {
    fn needs_numbers(self) -> bool {
        !matches!(self, Operation::Count | Operation::ValueCounts)
    }

    fn label(self) -> &'static str {
        match self {
            Operation::Describe => "describe",
            Operation::Count => "count",
            Operation::Sum => "sum",
            Operation::Mean => "mean",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::ValueCounts => "value_counts",
        }
    }
}

impl FromStr for Operation {
    type Err = FellowshipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "describe" | "summary" => Ok(Operation::Describe),
            "count" => Ok(Operation::Count),
            "sum" => Ok(Operation::Sum),
            "mean" | "average" | "avg" => Ok(Operation::Mean),
            "min" => Ok(Operation::Min),
            "max" => Ok(Operation::Max),
            "value_counts" | "counts" => Ok(Operation::ValueCounts),
            other => Err(FellowshipError::InvalidInput(format!(
                "Unknown operation '{}'. Expected one of: describe, count, sum, mean, min, max, value_counts",
                other
            ))),
        }
    }
}

/// Descriptive statistics over a set of numbers.
#[derive(Debug, Clone, PartialEq)]
struct Summary {
    count: usize,
    sum: f64,
    mean: f64,
    /// Sample standard deviation; undefined for fewer than two values.
    std: Option<f64>,
    min: f64,
    median: f64,
    max: f64,
}

impl Summary {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let std = (count > 1).then(|| {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };

        Some(Self {
            count,
            sum,
            mean,
            std,
            min: sorted[0],
            median,
            max: sorted[count - 1],
        })
    }

    fn inline(&self) -> String {
        format!(
            "count={}, mean={}, std={}, min={}, median={}, max={}",
            self.count,
            format_number(self.mean),
            self.std.map(format_number).unwrap_or_else(|| "n/a".to_string()),
            format_number(self.min),
            format_number(self.median),
            format_number(self.max)
        )
    }

    fn block(&self) -> String {
        self.inline().replace(", ", "\n").replace('=', ": ")
    }
}

/// Format a number without a trailing fractional part when it is whole.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Frequency of each distinct value, most frequent first, ties by value.
fn value_counts<'a>(cells: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in cells {
        *counts.entry(cell).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}

/// Non-blank cells of `column`, grouped by the value of `key` in order of first appearance.
fn group_cells<'a>(dataset: &'a Dataset, key: usize, column: usize) -> Vec<(&'a str, Vec<&'a str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for row in 0..dataset.row_count() {
        let group = dataset
            .cell(row, key)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(BLANK_GROUP);
        let position = match groups.iter().position(|(g, _)| *g == group) {
            Some(p) => p,
            None => {
                groups.push((group, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(cell) = dataset.cell(row, column).map(str::trim).filter(|c| !c.is_empty()) {
            groups[position].1.push(cell);
        }
    }
    groups
}

/// Apply an operation to a set of cells, rendering the result inline.
fn apply_inline(op: Operation, cells: &[&str]) -> String {
    if op == Operation::ValueCounts {
        return value_counts(cells)
            .iter()
            .map(|(value, n)| format!("{}={}", value, n))
            .collect::<Vec<_>>()
            .join(", ");
    }
    if !op.needs_numbers() {
        return cells.len().to_string();
    }

    let numbers: Vec<f64> = cells.iter().filter_map(|c| parse_number(c)).collect();
    Summary::of(&numbers)
        .map(|summary| numeric_stat(op, &summary))
        .unwrap_or_else(|| "n/a".to_string())
}

/// The statistic `op` selects from a summary.
fn numeric_stat(op: Operation, summary: &Summary) -> String {
    match op {
        Operation::Describe => summary.inline(),
        Operation::Count | Operation::ValueCounts => summary.count.to_string(),
        Operation::Sum => format_number(summary.sum),
        Operation::Mean => format_number(summary.mean),
        Operation::Min => format_number(summary.min),
        Operation::Max => format_number(summary.max),
    }
}

/// Computes summary statistics for a dataset column.
pub struct AnalyzeTool {
    registry: Arc<DatasetRegistry>,
}

impl AnalyzeTool {
    pub fn new() -> Self {
        Self::with_registry(DatasetRegistry::global())
    }

    pub(crate) fn with_registry(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }

    fn analyze(&self, dataset: &Dataset, column: &str, op: Operation, group_by: Option<&str>) -> Result<String> {
        let column_index = dataset.require_column(column)?;

        if op.needs_numbers() {
            match dataset.column_kind(column_index) {
                ColumnKind::Numeric => {}
                ColumnKind::Text => {
                    return Err(FellowshipError::InvalidInput(format!(
                        "Column '{}' is not numeric; '{}' needs numbers (try count or value_counts)",
                        column,
                        op.label()
                    )))
                }
                ColumnKind::Empty => {
                    return Err(FellowshipError::InvalidInput(format!(
                        "Column '{}' has no values",
                        column
                    )))
                }
            }
        }

        if let Some(key) = group_by {
            let key_index = dataset.require_column(key)?;
            let lines = group_cells(dataset, key_index, column_index)
                .iter()
                .map(|(group, cells)| format!("{}: {}", group, apply_inline(op, cells)))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(format!("{} of {} by {} in {}:\n{}", op.label(), column, key, dataset.name, lines));
        }

        let cells: Vec<&str> = dataset.values(column_index).collect();
        let result = match op {
            Operation::Describe => {
                let numbers = dataset.numeric_values(column_index);
                let summary = Summary::of(&numbers)
                    .ok_or_else(|| FellowshipError::InvalidInput(format!("Column '{}' has no values", column)))?;
                format!("{} ({}):\n{}", column, dataset.name, summary.block())
            }
            Operation::ValueCounts => {
                let lines = value_counts(&cells)
                    .iter()
                    .map(|(value, n)| format!("{}: {}", value, n))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Value counts for {} in {}:\n{}", column, dataset.name, lines)
            }
            _ => format!("{} of {} in {}: {}", op.label(), column, dataset.name, apply_inline(op, &cells)),
        };
        Ok(result)
    }
}

impl Default for AnalyzeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTool for AnalyzeTool {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn description(&self) -> &'static str {
        "Compute statistics for a dataset column: describe, count, sum, mean, min, max, or value_counts. \
        Optionally group the result by another column."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "dataset": {
                    "type": "string",
                    "description": "The dataset name"
                },
                "column": {
                    "type": "string",
                    "description": "Column to analyze"
                },
                "operation": {
                    "type": "string",
                    "enum": ["describe", "count", "sum", "mean", "min", "max", "value_counts"],
                    "description": "Statistic to compute (default: describe)",
                    "default": "describe"
                },
                "group_by": {
                    "type": "string",
                    "description": "Optional column to group by"
                }
            },
            "required": ["dataset", "column"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let dataset = self.registry.require(required_str(&args, "dataset")?)?;
        let column = required_str(&args, "column")?;
        let op = optional_str(&args, "operation").unwrap_or("describe").parse::<Operation>()?;
        let group_by = optional_str(&args, "group_by");

        debug!("Analyzing {}.{} ({:?}, group_by={:?})", dataset.name, column, op, group_by);

        self.analyze(&dataset, column, op, group_by)
    }
}

/// Kind of chart drawn by [`VisualizeTool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chart {
    Bar,
    Histogram,
}

impl FromStr for Chart {
    type Err = FellowshipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(Chart::Bar),
            "histogram" | "hist" => Ok(Chart::Histogram),
            other => Err(FellowshipError::InvalidInput(format!(
                "Unknown chart '{}'. Expected bar or histogram",
                other
            ))),
        }
    }
}

/// Bar of `value` relative to `max`, at most `BAR_WIDTH` cells.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let cells = ((value.abs() / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}

/// Draws text charts of dataset columns.
pub struct VisualizeTool {
    registry: Arc<DatasetRegistry>,
}

impl VisualizeTool {
    pub fn new() -> Self {
        Self::with_registry(DatasetRegistry::global())
    }

    pub(crate) fn with_registry(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }

    fn bar_chart(&self, dataset: &Dataset, column: usize, label_column: Option<usize>) -> Result<String> {
        let points: Vec<(String, f64)> = (0..dataset.row_count())
            .filter_map(|row| {
                let value = dataset.cell(row, column).and_then(parse_number)?;
                let label = label_column
                    .and_then(|l| dataset.cell(row, l))
                    .map(|l| l.trim().to_string())
                    .unwrap_or_else(|| (row + 1).to_string());
                Some((label, value))
            })
            .collect();

        if points.is_empty() {
            return Err(FellowshipError::InvalidInput(format!(
                "Column '{}' has no numeric values to chart",
                dataset.columns[column]
            )));
        }

        let shown = &points[..points.len().min(MAX_BARS)];
        let max = shown.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
        let label_width = shown.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

        let mut lines: Vec<String> = shown
            .iter()
            .map(|(label, value)| {
                format!(
                    "{:<width$} | {} {}",
                    label,
                    bar(*value, max),
                    format_number(*value),
                    width = label_width
                )
            })
            .collect();

        if points.len() > MAX_BARS {
            lines.push(format!("... {} more rows not shown", points.len() - MAX_BARS));
        }

        let by = label_column
            .map(|l| format!(" by {}", dataset.columns[l]))
            .unwrap_or_default();
        Ok(format!(
            "Bar chart of {}{} ({}):\n{}",
            dataset.columns[column],
            by,
            dataset.name,
            lines.join("\n")
        ))
    }

    fn histogram(&self, dataset: &Dataset, column: usize, bins: usize) -> Result<String> {
        if bins == 0 {
            return Err(FellowshipError::InvalidInput("bins must be at least 1".to_string()));
        }
        if bins > MAX_BINS {
            return Err(FellowshipError::InvalidInput(format!(
                "bins must be at most {}, got {}",
                MAX_BINS, bins
            )));
        }

        let values = dataset.numeric_values(column);
        let summary = Summary::of(&values).ok_or_else(|| {
            FellowshipError::InvalidInput(format!(
                "Column '{}' has no numeric values to chart",
                dataset.columns[column]
            ))
        })?;

        let (min, max) = (summary.min, summary.max);
        let bins = if min == max { 1 } else { bins };
        let width = if min == max { 1.0 } else { (max - min) / bins as f64 };

        let mut counts = vec![0usize; bins];
        for value in &values {
            let index = (((value - min) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        let peak = counts.iter().copied().max().unwrap_or(0) as f64;
        let ranges: Vec<String> = (0..bins)
            .map(|i| {
                let lo = min + width * i as f64;
                let hi = if i + 1 == bins { max.max(lo) } else { min + width * (i + 1) as f64 };
                let close = if i + 1 == bins { "]" } else { ")" };
                format!("[{}, {}{}", format_number(lo), format_number(hi), close)
            })
            .collect();
        let range_width = ranges.iter().map(|r| r.len()).max().unwrap_or(0);

        let lines = ranges
            .iter()
            .zip(&counts)
            .map(|(range, count)| {
                format!("{:<width$} | {} {}", range, bar(*count as f64, peak), count, width = range_width)
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "Histogram of {} ({}), {} bins:\n{}",
            dataset.columns[column], dataset.name, bins, lines
        ))
    }
}

impl Default for VisualizeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTool for VisualizeTool {
    fn name(&self) -> &'static str {
        "visualize"
    }

    fn description(&self) -> &'static str {
        "Draw a text chart of a numeric dataset column: a bar chart of each row's value \
        (optionally labelled by another column) or a histogram of the value distribution."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "dataset": {
                    "type": "string",
                    "description": "The dataset name"
                },
                "column": {
                    "type": "string",
                    "description": "Numeric column to chart"
                },
                "chart": {
                    "type": "string",
                    "enum": ["bar", "histogram"],
                    "description": "Chart type (default: bar)",
                    "default": "bar"
                },
                "label_column": {
                    "type": "string",
                    "description": "Column used to label bars (bar chart only)"
                },
                "bins": {
                    "type": "integer",
                    "description": "Number of bins (histogram only, default: 10)",
                    "default": DEFAULT_BINS,
                    "minimum": 1,
                    "maximum": MAX_BINS
                }
            },
            "required": ["dataset", "column"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let dataset = self.registry.require(required_str(&args, "dataset")?)?;
        let column = dataset.require_column(required_str(&args, "column")?)?;
        let chart = optional_str(&args, "chart").unwrap_or("bar").parse::<Chart>()?;

        match chart {
            Chart::Bar => {
                let label_column = optional_str(&args, "label_column")
                    .map(|l| dataset.require_column(l))
                    .transpose()?;
                self.bar_chart(&dataset, column, label_column)
            }
            Chart::Histogram => {
                let bins = optional_usize(&args, "bins").unwrap_or(DEFAULT_BINS);
                self.histogram(&dataset, column, bins)
            }
        }
    }
}
