//! Output box styles and their colour triples.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation category of an output box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Blue.
    #[default]
    Info,
    /// Green.
    Success,
    /// Yellow.
    Warning,
    /// Red.
    Error,
}

/// Background, text and border colours of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleColors {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

/// Indexed by `Style as usize`.
const STYLE_TABLE: [StyleColors; 4] = [
    StyleColors {
        background: "#EFF6FF",
        text: "#1D4ED8",
        border: "#DBEAFE",
    },
    StyleColors {
        background: "#F0FDF4",
        text: "#15803D",
        border: "#DCFCE7",
    },
    StyleColors {
        background: "#FFFBEB",
        text: "#A16207",
        border: "#FEF3C7",
    },
    StyleColors {
        background: "#FEF2F2",
        text: "#B91C1C",
        border: "#FEE2E2",
    },
];

impl Style {
    /// Every style, in table order.
    pub const ALL: [Style; 4] = [Style::Info, Style::Success, Style::Warning, Style::Error];

    /// Look up a style by its tag. Unrecognised tags fall back to `Info`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "info" => Style::Info,
            "success" => Style::Success,
            "warning" => Style::Warning,
            "error" => Style::Error,
            _ => Style::Info,
        }
    }

    /// The tag this style is looked up by.
    pub fn tag(self) -> &'static str {
        match self {
            Style::Info => "info",
            Style::Success => "success",
            Style::Warning => "warning",
            Style::Error => "error",
        }
    }

    /// Colour triple for this style.
    pub fn colors(self) -> StyleColors {
        STYLE_TABLE[self as usize]
    }
}

impl From<&str> for Style {
    fn from(tag: &str) -> Self {
        Style::from_tag(tag)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_map_to_their_colors() {
        let expected = [
            ("info", "#EFF6FF", "#1D4ED8", "#DBEAFE"),
            ("success", "#F0FDF4", "#15803D", "#DCFCE7"),
            ("warning", "#FFFBEB", "#A16207", "#FEF3C7"),
            ("error", "#FEF2F2", "#B91C1C", "#FEE2E2"),
        ];

        for (tag, bg, text, border) in expected {
            let colors = Style::from_tag(tag).colors();
            assert_eq!(colors.background, bg, "{tag}");
            assert_eq!(colors.text, text, "{tag}");
            assert_eq!(colors.border, border, "{tag}");
        }
    }

    #[test]
    fn test_unknown_tags_fall_back_to_info() {
        for tag in ["", "danger", "INFO", "Success", "note"] {
            assert_eq!(Style::from_tag(tag), Style::Info);
            assert_eq!(Style::from(tag).colors(), Style::Info.colors());
        }
    }

    #[test]
    fn test_tag_round_trips() {
        for style in Style::ALL {
            assert_eq!(Style::from_tag(style.tag()), style);
            assert_eq!(style.to_string(), style.tag());
        }
    }
}
