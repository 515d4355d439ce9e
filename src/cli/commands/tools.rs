//! Tools command implementation.

use crate::assistant::Toolbox;
use crate::cli::Output;

/// Run the tools command.
pub fn run_tools() {
    let toolbox = Toolbox::default();

    Output::header(&format!("Assistant tools ({})", toolbox.len()));
    println!();
    for tool in toolbox.iter() {
        Output::tool(tool.name(), tool.description());
    }
}
