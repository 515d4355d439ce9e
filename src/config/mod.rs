//! Configuration module for Fellowship.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AssistantPrompts, Prompts};
pub use settings::{AssistantSettings, CompletionSettings, GeneralSettings, PromptSettings, Settings};
