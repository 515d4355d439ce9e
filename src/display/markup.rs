//! Markup builders for notebook display blocks.
//!
//! Text is inserted verbatim: nothing is escaped, so callers own the safety of
//! what they pass in.

use super::style::Style;
use super::surface::Markup;
use std::fmt;

/// Column titles used when a table is rendered without explicit headers.
pub const DEFAULT_HEADERS: [&str; 2] = ["Technique", "Output"];

/// Label used by [`llm_response`].
pub const DEFAULT_RESPONSE_LABEL: &str = "LLM Response";

/// Heading level used when none is requested.
pub const DEFAULT_HEADING_LEVEL: usize = 2;

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif";
const EVEN_ROW_BACKGROUND: &str = "#F9FAFB";
const ODD_ROW_BACKGROUND: &str = "#FFFFFF";

/// Markdown heading with `level` hash marks.
pub fn heading(title: &str, level: usize) -> Markup {
    Markup::Markdown(format!("{} {}", "#".repeat(level), title))
}

/// Coloured, bordered block holding `content` as preformatted text.
///
/// An empty `label` omits the label line.
pub fn output_box(content: &str, label: &str, style: impl Into<Style>) -> Markup {
    let colors = style.into().colors();
    let (bg, text_color, border_color) = (colors.background, colors.text, colors.border);

    let label_html = if label.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div style="font-weight: 600; color: {text_color}; margin-bottom: 4px;">{label}</div>"#
        )
    };

    Markup::Html(format!(
        r##"
    <div style="background: {bg}; border-left: 4px solid {border_color}; padding: 12px 16px; border-radius: 4px; margin: 8px 0; font-family: {FONT_STACK};">
        {label_html}
        <pre style="margin: 0; white-space: pre-wrap; font-size: 13px; line-height: 1.5; color: #374151;">{content}</pre>
    </div>
    "##
    ))
}

/// Background colour of the table row at `index`.
pub fn row_background(index: usize) -> &'static str {
    if index % 2 == 0 {
        EVEN_ROW_BACKGROUND
    } else {
        ODD_ROW_BACKGROUND
    }
}

/// HTML table with one `<tr>` per row, in input order.
///
/// Rows are not checked against the header count; each row emits exactly the
/// cells it carries.
pub fn compare_table<R, C>(rows: impl IntoIterator<Item = R>, headers: &[&str]) -> Markup
where
    R: IntoIterator<Item = C>,
    C: fmt::Display,
{
    let header_html: String = headers
        .iter()
        .map(|h| {
            format!(
                r##"<th style="padding: 10px 14px; text-align: left; font-weight: 600; color: #374151;">{h}</th>"##
            )
        })
        .collect();

    let row_html: String = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let cells: String = row
                .into_iter()
                .map(|cell| format!(r##"<td style="padding: 10px 14px; color: #4B5563;">{cell}</td>"##))
                .collect();
            format!(
                r##"<tr style="background: {}; border-bottom: 1px solid #E5E7EB;">{cells}</tr>"##,
                row_background(i)
            )
        })
        .collect();

    Markup::Html(format!(
        r##"
    <table style="width: 100%; border-collapse: collapse; border: 1px solid #E5E7EB; border-radius: 6px; overflow: hidden; margin: 8px 0;">
        <thead><tr style="background: #F3F4F6; border-bottom: 2px solid #D1D5DB;">{header_html}</tr></thead>
        <tbody>{row_html}</tbody>
    </table>
    "##
    ))
}

/// [`compare_table`] over (label, value) pairs.
pub fn compare_pairs<A, B>(rows: &[(A, B)], headers: &[&str]) -> Markup
where
    A: fmt::Display,
    B: fmt::Display,
{
    compare_table(
        rows.iter()
            .map(|(label, value)| [label as &dyn fmt::Display, value as &dyn fmt::Display]),
        headers,
    )
}

/// Info-styled box labelled "LLM Response".
pub fn llm_response(response_text: &str) -> Markup {
    llm_response_labeled(response_text, DEFAULT_RESPONSE_LABEL)
}

/// Info-styled box with a caller-chosen label.
pub fn llm_response_labeled(response_text: &str, label: &str) -> Markup {
    output_box(response_text, label, Style::Info)
}

/// Horizontal rule, with `text` centred between two half rules when non-empty.
pub fn separator(text: &str) -> Markup {
    if text.is_empty() {
        return rule();
    }
    Markup::Html(format!(
        r##"<div style="display: flex; align-items: center; margin: 16px 0;"><hr style="flex: 1; border: none; border-top: 1px solid #D1D5DB;"/><span style="padding: 0 12px; color: #6B7280; font-size: 13px;">{text}</span><hr style="flex: 1; border: none; border-top: 1px solid #D1D5DB;"/></div>"##
    ))
}

/// Plain full-width rule.
pub fn rule() -> Markup {
    Markup::Html(
        r##"<hr style="border: none; border-top: 1px solid #D1D5DB; margin: 16px 0;">"##.to_string(),
    )
}
