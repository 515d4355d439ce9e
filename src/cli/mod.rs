//! CLI module for Fellowship.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Fellowship - workshop toolkit
///
/// Notebook display helpers, an analytics assistant over CSV datasets,
/// and single-shot chat completions.
#[derive(Parser, Debug)]
#[command(name = "fellowship")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one prompt to a chat model and print the reply
    Complete {
        /// Prompt to send (defaults to the configured prompt)
        prompt: Option<String>,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Print the reply as it is generated
        #[arg(short, long)]
        stream: bool,
    },

    /// Show the probability of each generated token and its top alternatives
    Tokens {
        /// Prompt to send (defaults to the configured prompt)
        prompt: Option<String>,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Re-scale the alternatives as if sampled at this temperature
        #[arg(short, long, default_value_t = 1.0)]
        temperature: f64,

        /// Also print a reply sampled from the re-scaled alternatives
        #[arg(long)]
        resample: bool,
    },

    /// Run the analytics assistant on a task
    Assistant {
        /// The task (e.g., "Which region sold the most units?")
        task: String,

        /// CSV files to load before the assistant starts
        #[arg(short, long = "data")]
        data: Vec<String>,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Load a CSV file and show its structure (no API calls)
    Inspect {
        /// Path to the CSV file
        path: String,

        /// Number of rows to preview
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// List the tools available to the assistant
    Tools,

    /// Render the display gallery to the terminal or a notebook file
    Showcase {
        /// Write a Jupyter notebook here instead of printing markup
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
