//! Showcase command - render every display block once.

use crate::cli::Output;
use crate::display::{
    DisplayFormatter, NotebookSurface, RenderSurface, Style, TerminalSurface, DEFAULT_HEADERS,
};
use crate::error::Result as LibResult;
use anyhow::Result;
use std::path::Path;

/// Source text stored in the generated notebook cell.
const NOTEBOOK_SOURCE: &str = "fellowship showcase";

/// Render the gallery of display blocks onto a surface.
pub fn render_gallery<S: RenderSurface>(display: &mut DisplayFormatter<S>) -> LibResult<()> {
    display.heading("Display gallery", 1)?;
    display.heading("Output boxes", 2)?;
    for style in Style::ALL {
        display.output_box(&format!("{} box.\nContent keeps its line breaks.", style), style.tag(), style)?;
    }

    display.separator("Comparison")?;
    display.compare_pairs(
        &[
            ("Zero-shot", "42%"),
            ("Few-shot", "67%"),
            ("Chain-of-thought", "78%"),
        ],
        &DEFAULT_HEADERS,
    )?;

    display.separator("")?;
    display.llm_response(
        "Why did the language model cross the road?\nIt predicted the other side had more tokens.",
    )?;
    Ok(())
}

/// Run the showcase command.
pub fn run_showcase(output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            let mut display = DisplayFormatter::new(NotebookSurface::new());
            render_gallery(&mut display)?;

            let surface = display.into_surface();
            surface.save(Path::new(path), NOTEBOOK_SOURCE)?;
            Output::success(&format!("Wrote {} outputs to {}", surface.outputs().len(), path));
        }
        None => {
            let mut display = DisplayFormatter::new(TerminalSurface::stdout());
            render_gallery(&mut display)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Markup;

    #[test]
    fn test_gallery_renders_every_block_kind() {
        let mut display = DisplayFormatter::new(NotebookSurface::new());
        render_gallery(&mut display).unwrap();

        let outputs = display.into_surface().outputs().to_vec();
        assert_eq!(outputs.len(), 10);
        assert!(matches!(outputs[0], Markup::Markdown(_)));
        assert!(outputs.iter().any(|m| m.body().contains(">Chain-of-thought</td>")));
        assert!(outputs.last().unwrap().body().contains("LLM Response"));
    }

    #[test]
    fn test_showcase_writes_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.ipynb");

        run_showcase(path.to_str()).unwrap();

        let notebook: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(notebook["cells"][0]["outputs"].as_array().unwrap().len(), 10);
    }
}
