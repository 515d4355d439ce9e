//! Analytics assistant with tool calling.
//!
//! Exposes the dataset and analytics tools to a chat model, which loads,
//! inspects and summarises CSV data to complete a task.

mod runner;
mod toolbox;

pub use runner::{Assistant, AssistantResponse, ToolCallRecord, DEFAULT_MAX_ITERATIONS};
pub use toolbox::Toolbox;
