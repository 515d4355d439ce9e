//! Complete command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::completion::{complete, stream_complete};
use crate::config::Settings;
use crate::openai::create_client_with_timeout;
use anyhow::Result;
use std::io::Write;
use std::time::Duration;

/// Run the complete command.
pub async fn run_complete(
    prompt: Option<String>,
    model: Option<String>,
    stream: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Complete) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.completion.model.clone());
    let prompt = prompt.unwrap_or_else(|| settings.completion.prompt.clone());
    let client = create_client_with_timeout(Duration::from_secs(settings.completion.timeout_seconds))?;

    if stream {
        let mut stdout = std::io::stdout();
        let result = stream_complete(&client, &model, &prompt, |delta| {
            print!("{}", delta);
            let _ = stdout.flush();
        })
        .await;
        println!();
        return result.map(|_| ()).map_err(|e| {
            Output::error(&format!("Completion failed: {}", e));
            e.into()
        });
    }

    let spinner = Output::spinner(&format!("Asking {}...", model));
    let result = complete(&client, &model, &prompt).await;
    spinner.finish_and_clear();

    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Completion failed: {}", e));
            Err(e.into())
        }
    }
}
