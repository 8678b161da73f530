//! Drawing tools and the per-session tool state

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// The tool applied by pointer gestures.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Eyedropper,
    Line,
    Rectangle,
    Circle,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Pencil,
        Tool::Eraser,
        Tool::Fill,
        Tool::Eyedropper,
        Tool::Line,
        Tool::Rectangle,
        Tool::Circle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Fill => "fill",
            Tool::Eyedropper => "eyedropper",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
        }
    }

    /// CSS cursor the host should show over the canvas.
    pub fn cursor(self) -> &'static str {
        match self {
            Tool::Pencil | Tool::Line | Tool::Rectangle | Tool::Circle => "crosshair",
            Tool::Eraser => "cell",
            Tool::Fill => "pointer",
            Tool::Eyedropper => "copy",
        }
    }

    /// Single-key shortcut selecting this tool.
    pub fn hotkey(self) -> char {
        match self {
            Tool::Pencil => 'p',
            Tool::Eraser => 'e',
            Tool::Fill => 'f',
            Tool::Eyedropper => 'i',
            Tool::Line => 'l',
            Tool::Rectangle => 'r',
            Tool::Circle => 'c',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.hotkey() == key)
    }

    /// Pencil and eraser paint continuously while dragging.
    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pencil | Tool::Eraser)
    }

    /// Line, rectangle and circle preview while dragging and paint on release.
    pub fn is_shape(self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Circle)
    }

    /// Tools whose drag ends with a history snapshot.
    pub fn commits_on_release(self) -> bool {
        self.is_freehand() || self.is_shape()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool '{0}' (expected one of: pencil, eraser, fill, eyedropper, line, rectangle, circle)")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == lower).ok_or(UnknownTool(s.to_string()))
    }
}

/// Current tool, primary color, drag anchor and last pointer cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    pub tool: Tool,
    pub color: Color,
    /// Grid cell where the current drag started (or the last freehand sample).
    pub anchor: Option<(i32, i32)>,
    /// Last cell the pointer was seen over during the current drag
    pub pointer: Option<(i32, i32)>,
}

impl ToolState {
    pub fn new(color: Color) -> Self {
        Self { tool: Tool::default(), color, anchor: None, pointer: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrips_names() {
        for tool in Tool::ALL {
            assert_eq!(tool.name().parse::<Tool>(), Ok(tool));
        }
        assert_eq!(" Circle ".parse::<Tool>(), Ok(Tool::Circle));
        assert!("brush".parse::<Tool>().is_err());
    }

    #[test]
    fn test_hotkeys_unique() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_hotkey(tool.hotkey()), Some(tool));
            assert_eq!(Tool::from_hotkey(tool.hotkey().to_ascii_uppercase()), Some(tool));
        }
        assert_eq!(Tool::from_hotkey('x'), None);
    }

    #[test]
    fn test_tool_classes() {
        assert!(Tool::Pencil.is_freehand());
        assert!(Tool::Circle.is_shape());
        assert!(!Tool::Fill.commits_on_release());
        assert!(!Tool::Eyedropper.commits_on_release());
        assert!(Tool::Eraser.commits_on_release());
        assert_eq!(Tool::Eyedropper.cursor(), "copy");
    }

    #[test]
    fn test_serde_lowercase() {
        let tool: Tool = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(tool, Tool::Rectangle);
    }
}
