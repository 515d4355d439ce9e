//! Tools for the analytics assistant.
//!
//! Every tool implements [`BaseTool`]. Dataset tools load and inspect CSV
//! data held in a shared registry; analytics tools compute statistics and
//! draw charts over it.

mod analytics;
mod base;
mod dataset;

pub use base::BaseTool;
pub use dataset::{clear_datasets, get_dataset, InspectDatasetTool, ListDatasetsTool, LoadCSVTool};
pub use analytics::{AnalyzeTool, VisualizeTool};
