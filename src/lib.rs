//! Fellowship - workshop toolkit
//!
//! Building blocks for hands-on LLM workshops.
//!
//! # Overview
//!
//! Fellowship provides:
//! - Display helpers that render headings, styled boxes, comparison tables
//!   and separators as HTML/Markdown for notebook output
//! - An analytics assistant that loads, inspects and summarises CSV datasets
//!   through tool calls
//! - A single-shot chat completion helper, with streaming and per-token
//!   probabilities
//!
//! # Architecture
//!
//! - `display` - Markup builders and rendering surfaces
//! - `tools` - Assistant tools (`BaseTool`, dataset and analytics tools)
//! - `frame` - In-memory tabular datasets
//! - `assistant` - Tool-calling loop over the tools
//! - `completion` - One prompt in, one reply out
//! - `probability` - Temperature, sampling and formatting of token probabilities
//! - `config` - Settings and prompt templates
//!
//! # Example
//!
//! ```rust,no_run
//! use fellowship::completion::complete;
//! use fellowship::openai::create_client;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = create_client()?;
//!     let joke = complete(&client, "gpt-4o-mini", "Write a joke about Large Language Models.").await?;
//!     println!("{}", joke);
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod completion;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod openai;
pub mod probability;
pub mod tools;

pub use error::{FellowshipError, Result};
