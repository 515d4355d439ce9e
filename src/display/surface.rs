//! Rendering surfaces that receive markup.

use crate::error::Result;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// A piece of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Html(String),
    Markdown(String),
}

impl Markup {
    /// The markup text.
    pub fn body(&self) -> &str {
        match self {
            Markup::Html(s) | Markup::Markdown(s) => s,
        }
    }

    /// MIME type used when the markup is stored in a notebook.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Markup::Html(_) => "text/html",
            Markup::Markdown(_) => "text/markdown",
        }
    }
}

/// Something that displays markup.
///
/// Each call is independent; call order is display order.
pub trait RenderSurface {
    fn render(&mut self, markup: Markup) -> Result<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn render(&mut self, markup: Markup) -> Result<()> {
        (**self).render(markup)
    }
}

/// Writes raw markup to a writer, one block per line.
pub struct TerminalSurface<W: Write = io::Stdout> {
    writer: W,
}

impl TerminalSurface {
    /// Surface writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn render(&mut self, markup: Markup) -> Result<()> {
        writeln!(self.writer, "{}", markup.body())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Records markup as Jupyter `display_data` outputs.
#[derive(Debug, Default)]
pub struct NotebookSurface {
    outputs: Vec<Markup>,
}

impl NotebookSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded markup, in render order.
    pub fn outputs(&self) -> &[Markup] {
        &self.outputs
    }

    /// Recorded markup as nbformat `display_data` objects.
    pub fn display_data(&self) -> Vec<Value> {
        self.outputs
            .iter()
            .map(|markup| {
                json!({
                    "output_type": "display_data",
                    "data": { markup.mime_type(): markup.body() },
                    "metadata": {}
                })
            })
            .collect()
    }

    /// Build an nbformat 4 notebook with a single code cell holding every output.
    pub fn to_notebook(&self, source: &str) -> Value {
        json!({
            "cells": [{
                "cell_type": "code",
                "execution_count": 1,
                "metadata": {},
                "outputs": self.display_data(),
                "source": source
            }],
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 4
        })
    }

    /// Write the notebook to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path, source: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.to_notebook(source))?;
        std::fs::write(path, content)?;
        debug!("Wrote {} outputs to {}", self.outputs.len(), path.display());
        Ok(())
    }
}

impl RenderSurface for NotebookSurface {
    fn render(&mut self, markup: Markup) -> Result<()> {
        self.outputs.push(markup);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_surface_writes_each_block_on_its_own_line() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.render(Markup::Markdown("## Title".to_string())).unwrap();
        surface.render(Markup::Html("<hr>".to_string())).unwrap();

        let written = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(written, "## Title\n<hr>\n");
    }

    #[test]
    fn test_notebook_surface_keeps_render_order_and_mime_types() {
        let mut surface = NotebookSurface::new();
        surface.render(Markup::Markdown("# One".to_string())).unwrap();
        surface.render(Markup::Html("<b>two</b>".to_string())).unwrap();

        let data = surface.display_data();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["output_type"], "display_data");
        assert_eq!(data[0]["data"]["text/markdown"], "# One");
        assert_eq!(data[1]["data"]["text/html"], "<b>two</b>");
    }

    #[test]
    fn test_notebook_save_writes_valid_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("gallery.ipynb");

        let mut surface = NotebookSurface::new();
        surface.render(Markup::Html("<hr>".to_string())).unwrap();
        surface.save(&path, "showcase()").unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["nbformat"], 4);
        assert_eq!(saved["cells"][0]["source"], "showcase()");
        assert_eq!(saved["cells"][0]["outputs"][0]["data"]["text/html"], "<hr>");
    }

    #[test]
    fn test_mut_reference_is_a_surface() {
        fn render_twice(mut surface: impl RenderSurface) {
            surface.render(Markup::Html("a".to_string())).unwrap();
            surface.render(Markup::Html("b".to_string())).unwrap();
        }

        let mut surface = NotebookSurface::new();
        render_twice(&mut surface);
        assert_eq!(surface.outputs().len(), 2);
    }
}
