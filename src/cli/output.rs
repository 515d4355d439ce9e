//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a tool name with its description.
    pub fn tool(name: &str, description: &str) {
        println!("  {} {}", style("*").cyan(), style(name).bold());
        println!("    {}", style(description).dim());
    }

    /// Print a tool call made by the assistant.
    pub fn tool_call(name: &str, arguments: &str) {
        println!(
            "  {} {} {}",
            style("*").cyan(),
            style(name).bold(),
            style(preview(arguments, 60)).dim()
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate text to `max_len` characters with an ellipsis.
fn preview(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max_len {
        text
    } else {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
