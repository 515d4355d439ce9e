//! CLI command implementations.

mod assistant;
mod complete;
mod config;
mod inspect;
mod showcase;
mod tokens;
mod tools;

pub use assistant::run_assistant;
pub use complete::run_complete;
pub use config::{resolve_config_path, run_config};
pub use inspect::run_inspect;
pub use showcase::{render_gallery, run_showcase};
pub use tokens::{resample, run_tokens, token_table};
pub use tools::run_tools;
