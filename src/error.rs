//! Error types for Fellowship.

use thiserror::Error;

/// Library-level error type for Fellowship operations.
#[derive(Error, Debug)]
pub enum FellowshipError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Fellowship operations.
pub type Result<T> = std::result::Result<T, FellowshipError>;
