//! Common interface for assistant tools.

use crate::error::{FellowshipError, Result};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::Value;

/// A capability the assistant can invoke by name with JSON arguments.
#[async_trait]
pub trait BaseTool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &'static str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    /// Run the tool and return its result as text.
    async fn execute(&self, args: Value) -> Result<String>;

    /// OpenAI function declaration for this tool.
    fn definition(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                parameters: Some(self.parameters()),
                strict: None,
            },
        }
    }
}

/// Required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args[key]
        .as_str()
        .ok_or_else(|| FellowshipError::Tool(format!("Missing '{}' argument", key)))
}

/// Optional string argument; blank strings count as absent.
pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args[key].as_str().filter(|s| !s.trim().is_empty())
}

/// Optional non-negative integer argument.
pub(crate) fn optional_usize(args: &Value, key: &str) -> Option<usize> {
    args[key].as_u64().map(|n| n as usize)
}
