//! Tokens command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::completion::token_probabilities;
use crate::config::Settings;
use crate::openai::create_client_with_timeout;
use crate::probability::{apply_temperature, format_probability, sample, top_k, TokenProbability, DEFAULT_TOP_K};
use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::time::Duration;

/// Table of each generated token, its probability, and the alternatives at
/// that position re-scaled to `temperature`.
pub fn token_table(tokens: &[TokenProbability], temperature: f64) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Token", "Probability", "Alternatives"]);

    for (i, token) in tokens.iter().enumerate() {
        let alternatives = top_k(&apply_temperature(&token.top_alternatives, temperature), DEFAULT_TOP_K)
            .iter()
            .map(|alt| format!("{:?} {}", alt.token, format_probability(alt.probability)))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            (i + 1).to_string(),
            format!("{:?}", token.token),
            format_probability(token.probability),
            alternatives,
        ]);
    }
    table
}

/// Re-generate the reply by sampling each position from its alternatives.
pub fn resample(tokens: &[TokenProbability], temperature: f64) -> String {
    let mut rng = rand::thread_rng();
    tokens
        .iter()
        .map(|token| {
            let tempered = apply_temperature(&token.top_alternatives, temperature);
            sample(&tempered, &mut rng)
                .map(|alt| alt.token.clone())
                .unwrap_or_else(|| token.token.clone())
        })
        .collect()
}

/// Run the tokens command.
pub async fn run_tokens(
    prompt: Option<String>,
    model: Option<String>,
    temperature: f64,
    resample_reply: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Complete) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.completion.model.clone());
    let prompt = prompt.unwrap_or_else(|| settings.completion.prompt.clone());
    let client = create_client_with_timeout(Duration::from_secs(settings.completion.timeout_seconds))?;

    let spinner = Output::spinner(&format!("Asking {} for token probabilities...", model));
    let result = token_probabilities(&client, &model, &prompt).await;
    spinner.finish_and_clear();

    let tokens = match result {
        Ok(tokens) => tokens,
        Err(e) => {
            Output::error(&format!("Completion failed: {}", e));
            return Err(e.into());
        }
    };

    let reply: String = tokens.iter().map(|t| t.token.as_str()).collect();
    Output::header("Reply");
    println!("{}", reply);

    Output::header(&format!("Tokens (temperature {})", temperature));
    println!("{}", token_table(&tokens, temperature));

    if resample_reply {
        Output::header("Resampled reply");
        println!("{}", resample(&tokens, temperature));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::TokenAlternative;

    fn tokens() -> Vec<TokenProbability> {
        vec![
            TokenProbability {
                token: "blue".to_string(),
                probability: 0.9,
                top_alternatives: vec![TokenAlternative::new("blue", 0.9), TokenAlternative::new("clear", 0.1)],
            },
            TokenProbability {
                token: ".".to_string(),
                probability: 1.0,
                top_alternatives: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_token_table() {
        let rendered = token_table(&tokens(), 1.0).to_string();
        assert!(rendered.contains("Probability"));
        assert!(rendered.contains("\"blue\""));
        assert!(rendered.contains("90.0%"));
        assert!(rendered.contains("\"clear\" 10.0%"));
        assert!(rendered.contains("100.0%"));
    }

    #[test]
    fn test_token_table_applies_temperature() {
        let rendered = token_table(&tokens(), 0.0).to_string();
        assert!(rendered.contains("\"blue\" 100.0%"));
        assert!(rendered.contains("\"clear\" 0.0%"));
    }

    #[test]
    fn test_resample_greedy_matches_most_likely() {
        assert_eq!(resample(&tokens(), 0.0), "blue.");
    }
}
