//! Prompt templates for Fellowship.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use super::Settings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub assistant: AssistantPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the analytics assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantPrompts {
    pub system: String,
    /// Task template; `{{task}}` and `{{context}}` are filled per run.
    pub user: String,
    /// Task template used when no context is given.
    pub user_without_context: String,
}

impl Default for AssistantPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a data analytics assistant working with CSV datasets.

You have tools to load CSV files, list and inspect loaded datasets, compute statistics, and draw text charts.
Think step-by-step about what information you need, then use the appropriate tools.

Guidelines:
- Use 'list_datasets' first if you need to know what data is loaded
- Use 'load_csv' to load a file the user mentions
- Use 'inspect_dataset' to learn the columns and their types before analyzing
- Use 'analyze' for statistics (describe, count, sum, mean, min, max, value_counts), optionally grouped
- Use 'visualize' to show a bar chart or histogram when a picture helps

When you have gathered enough information, provide your final response.
Quote the numbers you computed and name the dataset and columns they came from.
Include charts verbatim in a code block when you draw one."#
                .to_string(),

            user: "Context: {{context}}\n\nTask: {{task}}".to_string(),

            user_without_context: "{{task}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = Settings::expand_path(dir);

            let assistant_path = custom_path.join("assistant.toml");
            if assistant_path.exists() {
                let content = std::fs::read_to_string(&assistant_path)?;
                prompts.assistant = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.assistant.system.contains("inspect_dataset"));
        assert!(prompts.assistant.user.contains("{{task}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("team".to_string(), "config".to_string());
        custom.insert("org".to_string(), "Fellowship".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("team".to_string(), "call".to_string());

        let result = prompts.render_with_custom("{{team}} @ {{org}}", &vars);
        assert_eq!(result, "call @ Fellowship");
    }

    #[test]
    fn test_load_custom_assistant_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("assistant.toml"),
            "system = \"Be brief.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.assistant.system, "Be brief.");
        assert_eq!(prompts.assistant.user_without_context, "{{task}}");
    }
}
