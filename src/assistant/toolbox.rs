//! The set of tools offered to the assistant.

use crate::error::{FellowshipError, Result};
use crate::tools::{
    AnalyzeTool, BaseTool, InspectDatasetTool, ListDatasetsTool, LoadCSVTool, VisualizeTool,
};
use async_openai::types::ChatCompletionTool;
use tracing::debug;

/// Tools available to the assistant, looked up by name.
pub struct Toolbox {
    tools: Vec<Box<dyn BaseTool>>,
}

impl Toolbox {
    /// An empty toolbox.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool. A tool with the same name replaces the earlier one.
    pub fn with_tool(mut self, tool: impl BaseTool + 'static) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(Box::new(tool));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn BaseTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn BaseTool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function declarations for every tool, in insertion order.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Run a tool by name with JSON-encoded arguments.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| FellowshipError::Agent(format!("Unknown tool: {}", name)))?;

        let args: serde_json::Value = if arguments.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(arguments)
                .map_err(|e| FellowshipError::Agent(format!("Invalid tool arguments: {}", e)))?
        };

        debug!("Executing tool {}", name);
        tool.execute(args).await
    }
}

impl Default for Toolbox {
    /// Every dataset and analytics tool, backed by the shared dataset registry.
    fn default() -> Self {
        Self::empty()
            .with_tool(LoadCSVTool::new())
            .with_tool(ListDatasetsTool::new())
            .with_tool(InspectDatasetTool::new())
            .with_tool(AnalyzeTool::new())
            .with_tool(VisualizeTool::new())
    }
}
