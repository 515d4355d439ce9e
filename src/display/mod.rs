//! Notebook display formatting.
//!
//! Builds HTML and Markdown blocks (headings, styled boxes, comparison
//! tables, separators) and hands each one to a [`RenderSurface`]. The
//! builders in [`markup`] are pure; [`DisplayFormatter`] pairs them with a
//! surface so each call renders immediately.
//!
//! # Example
//!
//! ```rust
//! use fellowship::display::{DisplayFormatter, NotebookSurface, DEFAULT_HEADERS};
//!
//! let mut display = DisplayFormatter::new(NotebookSurface::new());
//! display.heading("Prompting techniques", 2)?;
//! display.compare_pairs(&[("Zero-shot", "42%"), ("Few-shot", "67%")], &DEFAULT_HEADERS)?;
//! display.separator("")?;
//! assert_eq!(display.surface().outputs().len(), 3);
//! # Ok::<(), fellowship::FellowshipError>(())
//! ```

pub mod markup;
mod style;
mod surface;

pub use markup::{DEFAULT_HEADERS, DEFAULT_HEADING_LEVEL, DEFAULT_RESPONSE_LABEL};
pub use style::{Style, StyleColors};
pub use surface::{Markup, NotebookSurface, RenderSurface, TerminalSurface};

use crate::error::Result;
use std::fmt;

/// Renders display blocks onto a surface, one render call per block.
pub struct DisplayFormatter<S> {
    surface: S,
}

impl<S: RenderSurface> DisplayFormatter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Markdown heading of the given level.
    pub fn heading(&mut self, title: &str, level: usize) -> Result<()> {
        self.surface.render(markup::heading(title, level))
    }

    /// Styled box; unknown style tags render as info.
    pub fn output_box(&mut self, content: &str, label: &str, style: impl Into<Style>) -> Result<()> {
        self.surface.render(markup::output_box(content, label, style))
    }

    /// Comparison table with alternating row backgrounds.
    pub fn compare_table<R, C>(&mut self, rows: impl IntoIterator<Item = R>, headers: &[&str]) -> Result<()>
    where
        R: IntoIterator<Item = C>,
        C: fmt::Display,
    {
        self.surface.render(markup::compare_table(rows, headers))
    }

    pub fn compare_pairs<A, B>(&mut self, rows: &[(A, B)], headers: &[&str]) -> Result<()>
    where
        A: fmt::Display,
        B: fmt::Display,
    {
        self.surface.render(markup::compare_pairs(rows, headers))
    }

    pub fn llm_response(&mut self, response_text: &str) -> Result<()> {
        self.surface.render(markup::llm_response(response_text))
    }

    pub fn llm_response_labeled(&mut self, response_text: &str, label: &str) -> Result<()> {
        self.surface.render(markup::llm_response_labeled(response_text, label))
    }

    /// Horizontal rule; non-empty text is centred between two half rules.
    pub fn separator(&mut self, text: &str) -> Result<()> {
        self.surface.render(markup::separator(text))
    }
}
