//! Recorded editing sessions
//!
//! A session is a stream of host events (pointer gestures, toolbar clicks,
//! key presses, waits) written as JSON5 objects, one per line or spread over
//! several lines. Replaying a session drives an [`Editor`] exactly as a host
//! UI would, on a virtual clock.
//!
//! ```text
//! {"type": "tool", "tool": "rectangle"}
//! {"type": "down", "x": 0, "y": 0}
//! {"type": "move", "x": 3, "y": 3}
//! {"type": "up", "x": 3, "y": 3}
//! ```

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::parse_color;
use crate::editor::Editor;
use crate::keymap::KeyPress;
use crate::numeric::{coerce_f64, coerce_i32, parse_number};
use crate::tools::Tool;

/// A number as a host form field would supply it: numeric, or text to parse.
///
/// Non-finite or unparseable values read as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn value(&self) -> f64 {
        match self {
            NumberInput::Number(n) => coerce_f64(*n),
            NumberInput::Text(text) => parse_number(text),
        }
    }

    pub fn as_i32(&self) -> i32 {
        coerce_i32(self.value())
    }
}

impl From<i32> for NumberInput {
    fn from(n: i32) -> Self {
        NumberInput::Number(f64::from(n))
    }
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Select a tool
    Tool { tool: Tool },
    /// Select a primary color
    Color { color: String },
    /// Pointer pressed on grid cell (x, y)
    Down { x: NumberInput, y: NumberInput },
    /// Pointer moved to grid cell (x, y)
    Move { x: NumberInput, y: NumberInput },
    /// Pointer released, optionally at a known cell
    Up {
        #[serde(default)]
        x: Option<NumberInput>,
        #[serde(default)]
        y: Option<NumberInput>,
    },
    /// Pointer left the surface, optionally last seen at a known cell
    Leave {
        #[serde(default)]
        x: Option<NumberInput>,
        #[serde(default)]
        y: Option<NumberInput>,
    },
    /// Key press routed through the shortcut table
    Key(KeyPress),
    Undo,
    Redo,
    /// Clear the grid at once
    Clear,
    /// Start holding the clear button
    ClearPress,
    /// Let go of the clear button
    ClearRelease,
    /// Switch the grid to `rows` rows
    Size { rows: NumberInput },
    /// Set the zoom, or change it by `delta`
    Zoom {
        #[serde(default)]
        size: Option<NumberInput>,
        #[serde(default)]
        delta: Option<NumberInput>,
    },
    /// Show or hide grid lines; toggles when `show` is absent
    Grid {
        #[serde(default)]
        show: Option<bool>,
    },
    /// The host surface changed size
    Resize { width: NumberInput, height: NumberInput },
    /// Advance the clock by `ms` milliseconds, firing due timers
    Wait { ms: NumberInput },
}

/// A non-fatal problem found while reading a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// Error type for session loading.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { message: String, line: usize },
}

/// Result of parsing a session stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub events: Vec<SessionEvent>,
    pub warnings: Vec<Warning>,
}

/// Parse a single JSON5 object into an event.
pub fn parse_event(text: &str, line: usize) -> Result<SessionEvent, SessionError> {
    json5::from_str(text).map_err(|e| SessionError::Parse { message: e.to_string(), line })
}

/// Tracks brace depth across lines to find where each object ends.
#[derive(Debug, Default)]
struct ObjectSplitter {
    buffer: String,
    depth: i32,
    in_string: bool,
    escape_next: bool,
}

impl ObjectSplitter {
    /// Append a line; returns true once the buffered text is a complete object.
    fn feed(&mut self, line: &str) -> bool {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);

        for ch in line.chars() {
            if self.escape_next {
                self.escape_next = false;
                continue;
            }
            match ch {
                '\\' if self.in_string => self.escape_next = true,
                '"' => self.in_string = !self.in_string,
                '{' | '[' if !self.in_string => self.depth += 1,
                '}' | ']' if !self.in_string => self.depth -= 1,
                _ => {}
            }
        }

        self.depth <= 0 && !self.buffer.trim().is_empty()
    }

    fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        *self = Self::default();
        text
    }

    fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

/// Parse a stream of JSON5 events, one per line or spanning lines.
///
/// Comments, trailing commas and unquoted keys are accepted. Parsing stops
/// at the first malformed object, which is reported as a warning with the
/// line it started on.
pub fn parse_session<R: Read>(reader: R) -> ParseResult {
    let mut result = ParseResult::default();
    let mut splitter = ObjectSplitter::default();
    let mut start_line = 1;

    for (i, line) in BufReader::new(reader).lines().map_while(Result::ok).enumerate() {
        let line_number = i + 1;
        if splitter.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            start_line = line_number;
        }

        if splitter.feed(&line) {
            match parse_event(&splitter.take(), start_line) {
                Ok(event) => result.events.push(event),
                Err(e) => {
                    result.warnings.push(Warning { message: e.to_string(), line: start_line });
                    return result;
                }
            }
        }
    }

    if !splitter.is_empty() {
        match parse_event(&splitter.take(), start_line) {
            Ok(event) => result.events.push(event),
            Err(e) => result.warnings.push(Warning { message: e.to_string(), line: start_line }),
        }
    }

    result
}

/// Read and parse a session file.
pub fn load_session(path: &Path) -> Result<ParseResult, SessionError> {
    let file = std::fs::File::open(path)?;
    Ok(parse_session(file))
}

/// Summary of a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    /// Events applied
    pub events: usize,
    /// History snapshots committed during the replay
    pub commits: usize,
    /// Events that were applied but looked wrong (e.g. unparseable colors)
    pub issues: Vec<String>,
    /// Virtual clock after the last event
    pub end: Duration,
}

/// Drive `editor` through `events` on a virtual clock starting at `start`.
///
/// Each event happens at the current clock value and due timers fire after
/// it. When the events run out the clock advances past the move and resize
/// delays so nothing debounced is left pending.
pub fn replay(editor: &mut Editor, events: &[SessionEvent], start: Duration) -> ReplayReport {
    let commits_before = editor.commit_count();
    let mut report = ReplayReport::default();
    let mut now = start;

    for (i, event) in events.iter().enumerate() {
        debug!(index = i, ?event, "replay event");
        now = apply_event(editor, event, now, &mut report.issues, i + 1);
        editor.tick(now);
        report.events += 1;
    }

    let timing = &editor.config().timing;
    now += Duration::from_millis(timing.move_debounce_ms.max(timing.resize_debounce_ms));
    editor.tick(now);

    report.commits = editor.commit_count() - commits_before;
    report.end = now;
    report
}

fn apply_event(
    editor: &mut Editor,
    event: &SessionEvent,
    now: Duration,
    issues: &mut Vec<String>,
    index: usize,
) -> Duration {
    match event {
        SessionEvent::Tool { tool } => editor.select_tool(*tool),
        SessionEvent::Color { color } => {
            if let Err(e) = parse_color(color) {
                warn!(%color, error = %e, "session selects an unparseable color");
                issues.push(format!("event {}: color '{}': {}", index, color, e));
            }
            editor.select_color(color.as_str());
        }
        SessionEvent::Down { x, y } => {
            editor.pointer_down(x.as_i32(), y.as_i32(), now);
        }
        SessionEvent::Move { x, y } => {
            editor.pointer_move(x.as_i32(), y.as_i32(), now);
        }
        SessionEvent::Up { x, y } => {
            editor.pointer_up(optional_cell(x, y), now);
        }
        SessionEvent::Leave { x, y } => {
            editor.pointer_leave(optional_cell(x, y), now);
        }
        SessionEvent::Key(press) => {
            if editor.handle_key(press).is_none() {
                debug!(key = %press.key, "key has no shortcut");
            }
        }
        SessionEvent::Undo => {
            editor.undo();
        }
        SessionEvent::Redo => {
            editor.redo();
        }
        SessionEvent::Clear => editor.clear(),
        SessionEvent::ClearPress => editor.press_clear(now),
        SessionEvent::ClearRelease => editor.release_clear(),
        SessionEvent::Size { rows } => {
            editor.set_rows(rows.as_i32().max(1) as usize);
        }
        SessionEvent::Zoom { size, delta } => match (size, delta) {
            (Some(size), _) => editor.set_zoom(size.as_i32()),
            (None, Some(delta)) => editor.zoom_by(delta.as_i32()),
            (None, None) => issues.push(format!("event {}: zoom needs `size` or `delta`", index)),
        },
        SessionEvent::Grid { show: Some(show) } => editor.set_show_grid(*show),
        SessionEvent::Grid { show: None } => {
            editor.toggle_grid();
        }
        SessionEvent::Resize { width, height } => {
            editor.request_resize(width.value(), height.value(), now);
        }
        SessionEvent::Wait { ms } => {
            let ms = ms.value().max(0.0) as u64;
            return now + Duration::from_millis(ms);
        }
    }
    now
}

/// A cell from a pair of optional coordinates; both must be present.
fn optional_cell(x: &Option<NumberInput>, y: &Option<NumberInput>) -> Option<(i32, i32)> {
    match (x, y) {
        (Some(x), Some(y)) => Some((x.as_i32(), y.as_i32())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use std::io::Cursor;

    fn editor(rows: usize, cols: usize) -> Editor {
        Editor::with_grid_size(EditorConfig::default(), rows, cols, 10)
    }

    #[test]
    fn test_parse_event_variants() {
        let event = parse_event(r#"{"type": "tool", "tool": "circle"}"#, 1).unwrap();
        assert_eq!(event, SessionEvent::Tool { tool: Tool::Circle });

        let event = parse_event(r#"{type: "up"}"#, 1).unwrap();
        assert_eq!(event, SessionEvent::Up { x: None, y: None });

        let event = parse_event(r#"{"type": "key", "key": "z", "ctrl": true}"#, 1).unwrap();
        assert_eq!(event, SessionEvent::Key(KeyPress::with_ctrl("z")));

        let event = parse_event(r#"{"type": "clear_press"}"#, 1).unwrap();
        assert_eq!(event, SessionEvent::ClearPress);
    }

    #[test]
    fn test_parse_event_rejects_unknown() {
        let err = parse_event(r#"{"type": "teleport"}"#, 7).unwrap_err();
        assert!(matches!(err, SessionError::Parse { line: 7, .. }));
        assert!(parse_event(r#"{"type": "tool", "tool": "brush"}"#, 1).is_err());
    }

    #[test]
    fn test_number_input_coercion() {
        assert_eq!(NumberInput::Number(3.7).as_i32(), 3);
        assert_eq!(NumberInput::Number(f64::NAN).as_i32(), 0);
        assert_eq!(NumberInput::Text("12".to_string()).as_i32(), 12);
        assert_eq!(NumberInput::Text("abc".to_string()).as_i32(), 0);
    }

    #[test]
    fn test_parse_session_multiline_and_comments() {
        let input = r#"// draw a dot
{"type": "down", "x": 1, "y": 2}

{
  "type": "up",
  "x": 1,
  "y": 2, // trailing comma next
}
"#;
        let result = parse_session(Cursor::new(input));
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.events.len(), 2);
    }

    #[test]
    fn test_parse_session_stops_at_error() {
        let input = "{\"type\": \"undo\"}\n{\"type\": \"bogus\"}\n{\"type\": \"redo\"}\n";
        let result = parse_session(Cursor::new(input));
        assert_eq!(result.events, vec![SessionEvent::Undo]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_replay_rectangle() {
        let input = r##"
{"type": "tool", "tool": "rectangle"}
{"type": "color", "color": "#4e8cff"}
{"type": "down", "x": 0, "y": 0}
{"type": "move", "x": 3, "y": 3}
{"type": "up", "x": 3, "y": 3}
"##;
        let parsed = parse_session(Cursor::new(input));
        let mut ed = editor(4, 4);
        let report = replay(&mut ed, &parsed.events, Duration::ZERO);
        assert_eq!(report.events, 5);
        assert_eq!(report.commits, 1);
        assert!(report.issues.is_empty());
        assert_eq!(ed.grid().painted_count(), 12);
    }

    #[test]
    fn test_replay_leave_commits_shape() {
        let input = r##"{"type": "tool", "tool": "line"}
{"type": "down", "x": 0, "y": 1}
{"type": "move", "x": 2, "y": 1}
{"type": "leave"}
{"type": "tool", "tool": "rectangle"}
{"type": "down", "x": 0, "y": 2}
{"type": "leave", "x": 3, "y": 3}
"##;
        let parsed = parse_session(Cursor::new(input));
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.events[3], SessionEvent::Leave { x: None, y: None });

        let mut ed = editor(4, 4);
        let report = replay(&mut ed, &parsed.events, Duration::ZERO);
        assert_eq!(report.commits, 2);
        // Line covers (0..=2, 1); the 4x2 outline adds rows 2 and 3
        assert_eq!(ed.grid().painted_count(), 3 + 8);
    }

    #[test]
    fn test_replay_wait_advances_clock() {
        let events = vec![
            SessionEvent::Down { x: 0.into(), y: 0.into() },
            SessionEvent::Up { x: None, y: None },
            SessionEvent::ClearPress,
            SessionEvent::Wait { ms: NumberInput::Number(900.0) },
        ];
        let mut ed = editor(2, 2);
        let report = replay(&mut ed, &events, Duration::from_secs(1));
        assert!(ed.grid().is_empty());
        assert_eq!(report.commits, 2);
        assert!(report.end >= Duration::from_millis(1900));
    }

    #[test]
    fn test_replay_settles_pending_resize() {
        let events = vec![SessionEvent::Resize {
            width: NumberInput::Number(10.0 * 6.0 + 24.0),
            height: NumberInput::Number(10.0 * 2.0 + 24.0),
        }];
        let mut ed = editor(2, 2);
        replay(&mut ed, &events, Duration::ZERO);
        assert_eq!(ed.grid().cols(), 6);
    }

    #[test]
    fn test_replay_reports_bad_color() {
        let events = vec![SessionEvent::Color { color: "not-a-color".to_string() }];
        let mut ed = editor(2, 2);
        let report = replay(&mut ed, &events, Duration::ZERO);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(ed.color().as_str(), "not-a-color");
    }
}
