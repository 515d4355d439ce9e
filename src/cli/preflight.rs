//! Pre-flight checks before API calls.
//!
//! Validates configuration up front so a command fails with a clear hint
//! instead of an opaque API error.

use crate::error::{FellowshipError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Completion requires an API key.
    Complete,
    /// The assistant requires an API key.
    Assistant,
    /// Local dataset inspection has no requirements.
    Inspect,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Complete | Operation::Assistant => check_api_key(),
        Operation::Inspect => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(FellowshipError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(FellowshipError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_inspect_no_requirements() {
        assert!(check(Operation::Inspect).is_ok());
    }
}
