//! Keyboard shortcut table
//!
//! Shortcuts call the same editor entry points as the toolbar buttons.

use serde::{Deserialize, Serialize};

use crate::tools::Tool;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectTool(Tool),
    Undo,
    Redo,
    ToggleGrid,
}

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyPress {
    /// The key value, e.g. `"z"` or `"G"`
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    /// True when focus is in a text field; shortcuts are then ignored
    #[serde(default)]
    pub in_text_input: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Default::default() }
    }

    pub fn with_ctrl(key: impl Into<String>) -> Self {
        Self { key: key.into(), ctrl: true, ..Default::default() }
    }
}

/// Map a key press to an action.
pub fn action_for(press: &KeyPress) -> Option<Action> {
    if press.in_text_input {
        return None;
    }

    let mut chars = press.key.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => return None,
    };

    if press.ctrl {
        return match key {
            'z' => Some(Action::Undo),
            'y' => Some(Action::Redo),
            _ => None,
        };
    }

    if key == 'g' {
        return Some(Action::ToggleGrid);
    }
    Tool::from_hotkey(key).map(Action::SelectTool)
}

/// `(keys, description)` rows for help output.
pub fn shortcut_table() -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = Tool::ALL
        .into_iter()
        .map(|t| (t.hotkey().to_ascii_uppercase().to_string(), format!("{} tool", t)))
        .collect();
    rows.push(("G".to_string(), "toggle grid lines".to_string()));
    rows.push(("Ctrl+Z".to_string(), "undo".to_string()));
    rows.push(("Ctrl+Y".to_string(), "redo".to_string()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_keys() {
        assert_eq!(action_for(&KeyPress::new("p")), Some(Action::SelectTool(Tool::Pencil)));
        assert_eq!(action_for(&KeyPress::new("R")), Some(Action::SelectTool(Tool::Rectangle)));
        assert_eq!(action_for(&KeyPress::new("i")), Some(Action::SelectTool(Tool::Eyedropper)));
    }

    #[test]
    fn test_ctrl_keys() {
        assert_eq!(action_for(&KeyPress::with_ctrl("z")), Some(Action::Undo));
        assert_eq!(action_for(&KeyPress::with_ctrl("Y")), Some(Action::Redo));
        assert_eq!(action_for(&KeyPress::with_ctrl("p")), None);
    }

    #[test]
    fn test_grid_toggle() {
        assert_eq!(action_for(&KeyPress::new("g")), Some(Action::ToggleGrid));
    }

    #[test]
    fn test_ignored_keys() {
        assert_eq!(action_for(&KeyPress::new("x")), None);
        assert_eq!(action_for(&KeyPress::new("Enter")), None);
        assert_eq!(action_for(&KeyPress::new("")), None);
        let typing = KeyPress { key: "p".to_string(), ctrl: false, in_text_input: true };
        assert_eq!(action_for(&typing), None);
    }

    #[test]
    fn test_shortcut_table_covers_tools() {
        let table = shortcut_table();
        assert_eq!(table.len(), Tool::ALL.len() + 3);
        assert!(table.iter().any(|(k, d)| k == "C" && d == "circle tool"));
    }
}
