//! Assistant runner with tool calling loop.

use super::toolbox::Toolbox;
use crate::config::Prompts;
use crate::error::{FellowshipError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Default cap on LLM calls per task.
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Analytics assistant that answers tasks by calling dataset tools.
pub struct Assistant {
    client: Client<OpenAIConfig>,
    model: String,
    toolbox: Toolbox,
    max_iterations: usize,
    prompts: Prompts,
}

impl Assistant {
    /// Create an assistant with the given tools and model.
    pub fn new(toolbox: Toolbox, model: &str) -> Result<Self> {
        Ok(Self::with_client(create_client()?, toolbox, model))
    }

    /// Create an assistant using an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, toolbox: Toolbox, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            toolbox,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set maximum iterations for the tool loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Build the user turn for a task.
    fn user_message(&self, task: &str, context: Option<&str>) -> String {
        let mut vars = HashMap::new();
        vars.insert("task".to_string(), task.to_string());

        match context {
            Some(ctx) => {
                vars.insert("context".to_string(), ctx.to_string());
                self.prompts.render_with_custom(&self.prompts.assistant.user, &vars)
            }
            None => self
                .prompts
                .render_with_custom(&self.prompts.assistant.user_without_context, &vars),
        }
    }

    /// Run the assistant on a task.
    #[instrument(skip(self, context), fields(model = %self.model))]
    pub async fn run(&self, task: &str, context: Option<&str>) -> Result<AssistantResponse> {
        let system = self
            .prompts
            .render_with_custom(&self.prompts.assistant.system, &HashMap::new());

        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| FellowshipError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(self.user_message(task, context))
                .build()
                .map_err(|e| FellowshipError::Agent(e.to_string()))?
                .into(),
        ];

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(FellowshipError::Agent(format!(
                    "Assistant exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Assistant iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(self.toolbox.definitions())
                .build()
                .map_err(|e| FellowshipError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| FellowshipError::OpenAI(format!("Assistant API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| FellowshipError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    return Ok(AssistantResponse {
                        content: choice.message.content.clone().unwrap_or_default(),
                        tool_calls: tool_calls_made,
                        iterations,
                    })
                }
            };

            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| FellowshipError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| FellowshipError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call; failures become the tool's reply to the model.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Assistant calling tool: {} with args: {}", name, arguments);

        let result = match self.toolbox.execute(name, arguments).await {
            Ok(output) => output,
            Err(e) => format!("Tool error: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an assistant run.
#[derive(Debug)]
pub struct AssistantResponse {
    /// The final response content.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the assistant.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
