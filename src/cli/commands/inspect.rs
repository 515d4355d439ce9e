//! Inspect command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::tools::{get_dataset, BaseTool, InspectDatasetTool, LoadCSVTool};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

/// Run the inspect command.
pub async fn run_inspect(path: &str, rows: Option<usize>, settings: Settings) -> Result<()> {
    preflight::check(Operation::Inspect)?;

    let name = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .context("CSV path has no file name")?;
    let rows = rows.unwrap_or(settings.assistant.preview_rows);

    let summary = LoadCSVTool::new()
        .execute(json!({ "path": path, "name": name }))
        .await?;
    Output::success(&summary);

    let report = InspectDatasetTool::new()
        .execute(json!({ "name": name, "rows": rows }))
        .await?;
    println!("\n{}\n", report);

    if let Some(dataset) = get_dataset(name) {
        Output::kv("Loaded at", &dataset.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string());
    }

    Ok(())
}
