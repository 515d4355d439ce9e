//! Assistant command implementation.

use crate::assistant::{Assistant, Toolbox};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::tools::{BaseTool, LoadCSVTool};
use anyhow::Result;
use serde_json::json;

/// Run the assistant command.
pub async fn run_assistant(
    task: &str,
    data: &[String],
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Assistant) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    // Preload files so the model starts with them registered
    let loader = LoadCSVTool::new();
    let mut loaded = Vec::new();
    for path in data {
        match loader.execute(json!({ "path": path })).await {
            Ok(summary) => {
                Output::info(&summary);
                loaded.push(summary);
            }
            Err(e) => {
                Output::error(&format!("Failed to load {}: {}", path, e));
                return Err(e.into());
            }
        }
    }
    let context = (!loaded.is_empty()).then(|| loaded.join("\n"));

    let model = model.unwrap_or_else(|| settings.assistant.model.clone());
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let assistant = Assistant::new(Toolbox::default(), &model)?
        .with_prompts(prompts)
        .with_max_iterations(settings.assistant.max_iterations);

    let spinner = Output::spinner("Assistant working...");
    let result = assistant.run(task, context.as_deref()).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::tool_call(&call.name, &call.arguments);
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Assistant failed: {}", e));
            Err(e.into())
        }
    }
}
