//! Dataset loading and inspection tools, plus the shared dataset registry.

use super::base::{optional_str, optional_usize, required_str, BaseTool};
use crate::error::{FellowshipError, Result};
use crate::frame::Dataset;
use async_trait::async_trait;
use comfy_table::presets::NOTHING;
use comfy_table::Table;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::{debug, info};

const DEFAULT_PREVIEW_ROWS: usize = 5;

static GLOBAL_REGISTRY: LazyLock<Arc<DatasetRegistry>> =
    LazyLock::new(|| Arc::new(DatasetRegistry::new()));

/// Named datasets shared between tools.
#[derive(Default)]
pub(crate) struct DatasetRegistry {
    datasets: RwLock<HashMap<String, Arc<Dataset>>>,
}

impl DatasetRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by default-constructed tools.
    pub(crate) fn global() -> Arc<DatasetRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Store a dataset under its name, returning the one it replaced.
    pub(crate) fn insert(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let mut datasets = self.datasets.write().unwrap_or_else(PoisonError::into_inner);
        datasets.insert(dataset.name.clone(), Arc::new(dataset))
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<Dataset>> {
        let datasets = self.datasets.read().unwrap_or_else(PoisonError::into_inner);
        datasets.get(name).cloned()
    }

    pub(crate) fn require(&self, name: &str) -> Result<Arc<Dataset>> {
        self.get(name)
            .ok_or_else(|| FellowshipError::DatasetNotFound(name.to_string()))
    }

    /// All datasets, sorted by name.
    pub(crate) fn list(&self) -> Vec<Arc<Dataset>> {
        let datasets = self.datasets.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<_> = datasets.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub(crate) fn clear(&self) {
        let mut datasets = self.datasets.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Clearing {} datasets", datasets.len());
        datasets.clear();
    }
}

/// Look up a loaded dataset by name.
pub fn get_dataset(name: &str) -> Option<Arc<Dataset>> {
    DatasetRegistry::global().get(name)
}

/// Remove every loaded dataset.
pub fn clear_datasets() {
    DatasetRegistry::global().clear();
}

/// Loads a CSV file into the registry.
pub struct LoadCSVTool {
    registry: Arc<DatasetRegistry>,
}

impl LoadCSVTool {
    pub fn new() -> Self {
        Self::with_registry(DatasetRegistry::global())
    }

    pub(crate) fn with_registry(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for LoadCSVTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTool for LoadCSVTool {
    fn name(&self) -> &'static str {
        "load_csv"
    }

    fn description(&self) -> &'static str {
        "Load a CSV file as a named dataset. The first row must contain column names. \
        Use this before inspecting or analyzing data from a file."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the CSV file"
                },
                "name": {
                    "type": "string",
                    "description": "Name to register the dataset under (default: file name without extension)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let raw_path = required_str(&args, "path")?;
        let path = PathBuf::from(shellexpand::tilde(raw_path).to_string());

        let name = match optional_str(&args, "name") {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    FellowshipError::InvalidInput(format!("Cannot derive a dataset name from '{}'", raw_path))
                })?,
        };

        let dataset = Dataset::from_csv_path(&name, &path)?;
        let summary = format!(
            "Loaded dataset '{}' from {}: {} rows, {} columns ({})",
            name,
            path.display(),
            dataset.row_count(),
            dataset.column_count(),
            dataset.columns.join(", ")
        );

        info!("Loaded dataset '{}' ({} rows)", name, dataset.row_count());

        match self.registry.insert(dataset) {
            Some(_) => Ok(format!("{} (replaced previous dataset)", summary)),
            None => Ok(summary),
        }
    }
}

/// Lists the datasets currently loaded.
pub struct ListDatasetsTool {
    registry: Arc<DatasetRegistry>,
}

impl ListDatasetsTool {
    pub fn new() -> Self {
        Self::with_registry(DatasetRegistry::global())
    }

    pub(crate) fn with_registry(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for ListDatasetsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTool for ListDatasetsTool {
    fn name(&self) -> &'static str {
        "list_datasets"
    }

    fn description(&self) -> &'static str {
        "List all loaded datasets with their row and column counts. \
        Use this to see what data is available."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> Result<String> {
        let datasets = self.registry.list();

        if datasets.is_empty() {
            return Ok("No datasets loaded. Use load_csv to load a CSV file.".to_string());
        }

        let formatted = datasets
            .iter()
            .map(|d| format!("- {}: {} rows, {} columns", d.name, d.row_count(), d.column_count()))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!("Loaded datasets ({}):\n\n{}", datasets.len(), formatted))
    }
}

/// Describes a dataset's shape, column types and first rows.
pub struct InspectDatasetTool {
    registry: Arc<DatasetRegistry>,
}

impl InspectDatasetTool {
    pub fn new() -> Self {
        Self::with_registry(DatasetRegistry::global())
    }

    pub(crate) fn with_registry(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for InspectDatasetTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTool for InspectDatasetTool {
    fn name(&self) -> &'static str {
        "inspect_dataset"
    }

    fn description(&self) -> &'static str {
        "Show a dataset's shape, column names with inferred types, and its first rows. \
        Use this to understand the structure of the data before analyzing it."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The dataset name"
                },
                "rows": {
                    "type": "integer",
                    "description": "Number of rows to preview (default: 5)",
                    "default": DEFAULT_PREVIEW_ROWS
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let name = required_str(&args, "name")?;
        let preview_rows = optional_usize(&args, "rows").unwrap_or(DEFAULT_PREVIEW_ROWS);
        let dataset = self.registry.require(name)?;

        Ok(describe_dataset(&dataset, preview_rows))
    }
}

/// Text summary of a dataset with a preview of its first rows.
fn describe_dataset(dataset: &Dataset, preview_rows: usize) -> String {
    let mut out = format!("Dataset: {}\n", dataset.name);
    if let Some(source) = &dataset.source {
        out.push_str(&format!("Source: {}\n", source.display()));
    }
    out.push_str(&format!(
        "Shape: {} rows x {} columns\n\nColumns:\n",
        dataset.row_count(),
        dataset.column_count()
    ));

    for (i, column) in dataset.columns.iter().enumerate() {
        out.push_str(&format!("- {} ({})\n", column, dataset.column_kind(i)));
    }

    let shown = preview_rows.min(dataset.row_count());
    if shown > 0 {
        let mut table = Table::new();
        table.load_preset(NOTHING).set_header(&dataset.columns);
        for row in dataset.rows.iter().take(shown) {
            table.add_row(row);
        }
        out.push_str(&format!("\nFirst {} rows:\n{}", shown, table));
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES: &str = "region,units\nnorth,10\nsouth,4\neast,7\n";

    fn write_csv(dir: &tempfile::TempDir, file: &str, content: &str) -> String {
        let path = dir.path().join(file);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_load_csv_uses_file_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "sales.csv", SALES);
        let registry = Arc::new(DatasetRegistry::new());

        let tool = LoadCSVTool::with_registry(Arc::clone(&registry));
        let result = tool.execute(json!({ "path": path })).await.unwrap();

        assert!(result.starts_with("Loaded dataset 'sales'"));
        assert!(result.contains("3 rows, 2 columns (region, units)"));
        assert_eq!(registry.get("sales").unwrap().row_count(), 3);
    }

    #[tokio::test]
    async fn test_load_csv_replaces_existing_name() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_csv(&dir, "a.csv", SALES);
        let second = write_csv(&dir, "b.csv", "x\n1\n");
        let registry = Arc::new(DatasetRegistry::new());
        let tool = LoadCSVTool::with_registry(Arc::clone(&registry));

        tool.execute(json!({ "path": first, "name": "data" })).await.unwrap();
        let result = tool.execute(json!({ "path": second, "name": "data" })).await.unwrap();

        assert!(result.ends_with("(replaced previous dataset)"));
        assert_eq!(registry.get("data").unwrap().columns, vec!["x"]);
        assert_eq!(registry.list().len(), 1);
    }

    #[tokio::test]
    async fn test_load_csv_missing_file() {
        let tool = LoadCSVTool::with_registry(Arc::new(DatasetRegistry::new()));
        let err = tool
            .execute(json!({ "path": "/definitely/not/here.csv" }))
            .await
            .unwrap_err();
        assert!(matches!(err, FellowshipError::Io(_)));
        assert!(tool.execute(json!({})).await.is_err());
    }

    #[tokio::test]
    async fn test_list_datasets_sorted() {
        let registry = Arc::new(DatasetRegistry::new());
        let tool = ListDatasetsTool::with_registry(Arc::clone(&registry));

        let empty = tool.execute(json!({})).await.unwrap();
        assert!(empty.starts_with("No datasets loaded"));

        registry.insert(Dataset::new("zeta", vec!["a".into()], vec![vec!["1".into()]]));
        registry.insert(Dataset::new("alpha", vec!["a".into(), "b".into()], Vec::new()));

        let listed = tool.execute(json!({})).await.unwrap();
        assert!(listed.starts_with("Loaded datasets (2):"));
        let alpha = listed.find("- alpha: 0 rows, 2 columns").unwrap();
        let zeta = listed.find("- zeta: 1 rows, 1 columns").unwrap();
        assert!(alpha < zeta);
    }

    #[tokio::test]
    async fn test_inspect_dataset() {
        let registry = Arc::new(DatasetRegistry::new());
        registry.insert(Dataset::from_csv_reader("sales", SALES.as_bytes()).unwrap());
        let tool = InspectDatasetTool::with_registry(Arc::clone(&registry));

        let result = tool.execute(json!({ "name": "sales", "rows": 2 })).await.unwrap();
        assert!(result.contains("Shape: 3 rows x 2 columns"));
        assert!(result.contains("- region (text)"));
        assert!(result.contains("- units (numeric)"));
        assert!(!result.contains("east"));

        let (_, preview) = result.split_once("First 2 rows:\n").unwrap();
        let cells: Vec<Vec<&str>> = preview
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();
        assert_eq!(cells, vec![vec!["region", "units"], vec!["north", "10"], vec!["south", "4"]]);
    }

    #[tokio::test]
    async fn test_inspect_keeps_cells_with_separators_intact() {
        let registry = Arc::new(DatasetRegistry::new());
        let csv = "label,note\na | b,\"x, y\"\nplain,z\n";
        registry.insert(Dataset::from_csv_reader("notes", csv.as_bytes()).unwrap());
        let tool = InspectDatasetTool::with_registry(registry);

        let result = tool.execute(json!({ "name": "notes" })).await.unwrap();
        let (_, preview) = result.split_once("First 2 rows:\n").unwrap();
        let lines: Vec<&str> = preview.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("a | b"));
        assert!(lines[1].contains("x, y"));
        // Columns line up under their headers.
        assert_eq!(lines[0].find("note"), lines[1].find("x, y"));
        assert_eq!(lines[0].find("note"), lines[2].find('z'));
    }

    #[tokio::test]
    async fn test_inspect_unknown_dataset() {
        let tool = InspectDatasetTool::with_registry(Arc::new(DatasetRegistry::new()));
        let err = tool.execute(json!({ "name": "nope" })).await.unwrap_err();
        assert!(matches!(err, FellowshipError::DatasetNotFound(name) if name == "nope"));
    }

    // The only test that touches the process-wide registry.
    #[test]
    fn test_global_registry_functions() {
        DatasetRegistry::global().insert(Dataset::new("global-test", vec!["a".into()], Vec::new()));
        assert_eq!(get_dataset("global-test").unwrap().name, "global-test");

        clear_datasets();
        assert!(get_dataset("global-test").is_none());
    }
}
