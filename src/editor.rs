//! The editor: one instance owns all drawing state and is driven through
//! its entry points.
//!
//! Hosts translate their input into calls on [`Editor`]: pointer gestures in
//! grid coordinates, toolbar actions, key presses and surface resizes. Every
//! entry point that takes time receives it as a [`Duration`] since a host
//! chosen epoch; pending timers fire from [`Editor::tick`].
//!
//! Gestures follow a two-state machine. Pencil, eraser and the shape tools
//! enter the dragging state on pointer down and leave it on pointer up (or
//! when the pointer leaves the surface). Fill and eyedropper act once on
//! pointer down and stay idle. A gesture that changed the grid ends with
//! exactly one history snapshot.

use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::config::EditorConfig;
use crate::debounce::{Debouncer, HoldTimer};
use crate::export::ExportImage;
use crate::grid::{GridLayout, PixelGrid};
use crate::history::History;
use crate::keymap::{action_for, Action, KeyPress};
use crate::numeric::coerce_f64;
use crate::palette::Palette;
use crate::renderer::{render_canvas, render_preview, PreviewInk, RenderOptions};
use crate::shapes::{rasterize_circle, rasterize_line, rasterize_rect_outline};
use crate::tools::{Tool, ToolState};

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        /// Whether any cell has been written during this drag
        changed: bool,
    },
}

/// Cells a shape tool covers between its anchor and the pointer.
pub fn shape_points(tool: Tool, anchor: (i32, i32), pointer: (i32, i32), grid: &PixelGrid) -> Vec<(i32, i32)> {
    match tool {
        Tool::Line => rasterize_line(anchor, pointer),
        Tool::Rectangle => rasterize_rect_outline(anchor, pointer),
        Tool::Circle => rasterize_circle(anchor, pointer, Some(grid.bounds())),
        _ => Vec::new(),
    }
}

/// A pixel-art editing session.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    surface: (f64, f64),
    grid: PixelGrid,
    layout: GridLayout,
    state: ToolState,
    gesture: Gesture,
    preview: Vec<(i32, i32)>,
    history: History,
    palette: Palette,
    show_grid: bool,
    moves: Debouncer<(i32, i32)>,
    resizes: Debouncer<(f64, f64)>,
    clear_hold: HoldTimer,
    commits: usize,
}

impl Editor {
    /// Create an editor fitted to a host surface of `surface_w` x `surface_h` pixels.
    pub fn new(config: EditorConfig, surface_w: f64, surface_h: f64) -> Self {
        let surface = (coerce_f64(surface_w), coerce_f64(surface_h));
        let layout = GridLayout::compute(surface.0, surface.1, config.canvas.rows, &config.canvas);
        let grid = PixelGrid::new(layout.rows, layout.cols);
        let history = History::new(&grid, config.history.capacity);
        let palette = Palette::new(config.palette.colors.iter().cloned(), config.palette.recent_capacity);
        let state = ToolState::new(Color::new(config.palette.initial_color.clone()));
        let timing = &config.timing;

        info!(rows = layout.rows, cols = layout.cols, pixel_size = layout.pixel_size, "editor created");

        Self {
            surface,
            grid,
            layout,
            state,
            gesture: Gesture::Idle,
            preview: Vec::new(),
            history,
            palette,
            show_grid: config.canvas.show_grid,
            moves: Debouncer::new(Duration::from_millis(timing.move_debounce_ms)),
            resizes: Debouncer::new(Duration::from_millis(timing.resize_debounce_ms)),
            clear_hold: HoldTimer::new(Duration::from_millis(timing.clear_hold_ms)),
            commits: 0,
            config,
        }
    }

    /// Editor with a grid of exactly `rows` x `cols` cells at `pixel_size`.
    ///
    /// The surface is sized so that the layout computation lands on those
    /// dimensions.
    pub fn with_grid_size(mut config: EditorConfig, rows: usize, cols: usize, pixel_size: u32) -> Self {
        let rows = rows.max(1);
        let pixel_size = pixel_size.max(config.canvas.min_pixel_size).max(1);
        config.canvas.rows = rows;
        let margin = f64::from(config.canvas.surface_margin);
        let w = (cols.max(1) as f64) * f64::from(pixel_size) + margin;
        let h = (rows as f64) * f64::from(pixel_size) + margin;
        Self::new(config, w, h)
    }

    // Views

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> Tool {
        self.state.tool
    }

    pub fn color(&self) -> &Color {
        &self.state.color
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Snapshots committed since the editor was created.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Swatch matching the current color, for highlighting.
    pub fn selected_swatch(&self) -> Option<usize> {
        self.palette.selected_index(&self.state.color)
    }

    /// Cells of the shape being dragged, not yet written to the grid.
    pub fn preview(&self) -> &[(i32, i32)] {
        &self.preview
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Progress of a hold-to-clear press, from 0 to 1.
    pub fn clear_progress(&self, now: Duration) -> f32 {
        self.clear_hold.progress(now)
    }

    /// True while a debounced move, resize or clear hold is waiting to fire.
    pub fn has_pending_timers(&self) -> bool {
        self.moves.is_pending() || self.resizes.is_pending() || self.clear_hold.is_held()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pixel_size: self.layout.pixel_size,
            show_grid: self.show_grid,
            grid_line_min_pixel_size: self.config.canvas.grid_line_min_pixel_size,
        }
    }

    /// Full redraw of the surface, with the shape preview on top while dragging.
    pub fn render(&self) -> RgbaImage {
        let opts = self.render_options();
        if self.preview.is_empty() {
            render_canvas(&self.grid, &opts)
        } else {
            render_preview(&self.grid, &opts, &self.preview, &self.preview_ink())
        }
    }

    fn preview_ink(&self) -> PreviewInk {
        match self.state.tool {
            Tool::Eraser => PreviewInk::Eraser,
            _ => PreviewInk::Color(self.state.color.clone()),
        }
    }

    /// Upscaled export of the grid toward the configured target size.
    pub fn export(&self) -> ExportImage {
        ExportImage::from_grid(&self.grid, self.config.export.target_size, &self.config.export.file_prefix)
    }

    /// Map surface pixel coordinates to the grid cell under them.
    ///
    /// The result is clamped into the grid; non-finite input counts as 0.
    pub fn grid_pos(&self, surface_x: f64, surface_y: f64) -> (i32, i32) {
        let ps = f64::from(self.layout.pixel_size.max(1));
        let col = (coerce_f64(surface_x) / ps).floor();
        let row = (coerce_f64(surface_y) / ps).floor();
        let max_col = self.layout.cols.saturating_sub(1) as f64;
        let max_row = self.layout.rows.saturating_sub(1) as f64;
        (col.clamp(0.0, max_col) as i32, row.clamp(0.0, max_row) as i32)
    }

    fn clamp_to_grid(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let max_x = self.grid.cols().saturating_sub(1) as i32;
        let max_y = self.grid.rows().saturating_sub(1) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    // Pointer gestures

    /// Start a gesture at grid cell `(x, y)`.
    ///
    /// Returns true when the grid or the selected color changed.
    pub fn pointer_down(&mut self, x: i32, y: i32, now: Duration) -> bool {
        if self.is_dragging() {
            self.pointer_leave(None, now);
        }
        let pos = self.clamp_to_grid((x, y));
        let tool = self.state.tool;
        debug!(%tool, x = pos.0, y = pos.1, "pointer down");
        self.state.pointer = Some(pos);

        match tool {
            Tool::Pencil | Tool::Eraser => {
                let value = self.ink();
                let changed = self.grid.apply(&[pos], value.as_ref()) > 0;
                self.state.anchor = Some(pos);
                self.gesture = Gesture::Dragging { changed };
                changed
            }
            Tool::Line | Tool::Rectangle | Tool::Circle => {
                self.state.anchor = Some(pos);
                self.gesture = Gesture::Dragging { changed: false };
                self.preview = shape_points(tool, pos, pos, &self.grid);
                false
            }
            Tool::Fill => {
                let fill = self.state.color.clone();
                let filled = self.grid.flood_fill(pos.0, pos.1, Some(&fill));
                if filled > 0 {
                    debug!(cells = filled, "flood fill");
                    self.commit();
                }
                filled > 0
            }
            Tool::Eyedropper => match self.grid.get(pos.0, pos.1).cloned() {
                Some(color) => {
                    self.select_color(color);
                    true
                }
                None => false,
            },
        }
    }

    /// Pointer moved to grid cell `(x, y)`. Ignored unless dragging.
    ///
    /// With a zero move delay the move applies at once; otherwise it waits
    /// for [`Editor::tick`], and a newer move replaces one still pending.
    pub fn pointer_move(&mut self, x: i32, y: i32, now: Duration) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let pos = self.clamp_to_grid((x, y));
        self.state.pointer = Some(pos);
        self.moves.schedule(pos, now);
        match self.moves.poll(now) {
            Some(pos) => self.apply_move(pos),
            None => false,
        }
    }

    /// Release the pointer, at `pos` if the host knows where.
    ///
    /// A shape released without a position (a touch that ended off the
    /// surface) is dropped. Returns true when a history snapshot was committed.
    pub fn pointer_up(&mut self, pos: Option<(i32, i32)>, now: Duration) -> bool {
        self.end_gesture(pos, now)
    }

    /// The pointer left the surface, last seen at `pos` if the host knows.
    ///
    /// Ends the gesture like a release at that cell, or at the last cell the
    /// pointer was over; a dragged shape is committed there.
    pub fn pointer_leave(&mut self, pos: Option<(i32, i32)>, now: Duration) -> bool {
        let end = pos.or(self.state.pointer);
        self.end_gesture(end, now)
    }

    fn ink(&self) -> Option<Color> {
        match self.state.tool {
            Tool::Eraser => None,
            _ => Some(self.state.color.clone()),
        }
    }

    fn apply_move(&mut self, pos: (i32, i32)) -> bool {
        let Gesture::Dragging { changed } = self.gesture else {
            return false;
        };
        let Some(anchor) = self.state.anchor else {
            return false;
        };
        let tool = self.state.tool;

        if tool.is_freehand() {
            // Interpolate from the previous sample so fast strokes stay unbroken
            let value = self.ink();
            let written = self.grid.apply(&rasterize_line(anchor, pos), value.as_ref());
            self.state.anchor = Some(pos);
            self.gesture = Gesture::Dragging { changed: changed || written > 0 };
            written > 0
        } else if tool.is_shape() {
            self.preview = shape_points(tool, anchor, pos, &self.grid);
            true
        } else {
            false
        }
    }

    fn end_gesture(&mut self, pos: Option<(i32, i32)>, now: Duration) -> bool {
        if let Some(pending) = self.moves.flush() {
            self.apply_move(pending);
        }
        let Gesture::Dragging { mut changed } = self.gesture else {
            return false;
        };
        let tool = self.state.tool;

        if let (Some(anchor), Some(pos)) = (self.state.anchor, pos) {
            if tool.is_shape() {
                let pos = self.clamp_to_grid(pos);
                let points = shape_points(tool, anchor, pos, &self.grid);
                let color = self.state.color.clone();
                changed |= self.grid.apply(&points, Some(&color)) > 0;
            }
        }

        self.preview.clear();
        self.state.anchor = None;
        self.state.pointer = None;
        self.gesture = Gesture::Idle;
        debug!(%tool, changed, at_ms = now.as_millis() as u64, "gesture ended");

        if changed && tool.commits_on_release() {
            self.commit();
            true
        } else {
            false
        }
    }

    // Timers

    /// Fire whatever timers are due. Returns true when a redraw is needed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut redraw = false;
        if let Some(pos) = self.moves.poll(now) {
            redraw |= self.apply_move(pos);
        }
        if let Some((w, h)) = self.resizes.poll(now) {
            self.apply_resize(w, h);
            redraw = true;
        }
        if self.clear_hold.poll(now) {
            self.clear();
            redraw = true;
        }
        redraw
    }

    /// The host surface changed size. Applied after the resize delay; a
    /// newer request replaces one still pending.
    pub fn request_resize(&mut self, surface_w: f64, surface_h: f64, now: Duration) {
        self.resizes.schedule((coerce_f64(surface_w), coerce_f64(surface_h)), now);
        if let Some((w, h)) = self.resizes.poll(now) {
            self.apply_resize(w, h);
        }
    }

    /// Refit the layout to a new surface, keeping the overlapping cells.
    ///
    /// History is kept; it is not a drawing action and does not commit.
    fn apply_resize(&mut self, surface_w: f64, surface_h: f64) {
        self.surface = (surface_w, surface_h);
        self.layout = GridLayout::compute(surface_w, surface_h, self.layout.rows, &self.config.canvas);
        if (self.grid.rows(), self.grid.cols()) != (self.layout.rows, self.layout.cols) {
            self.grid = self.grid.resized(self.layout.rows, self.layout.cols);
        }
        info!(rows = self.layout.rows, cols = self.layout.cols, pixel_size = self.layout.pixel_size, "surface resized");
    }

    // Toolbar actions

    pub fn select_tool(&mut self, tool: Tool) {
        if self.is_dragging() {
            self.pointer_leave(None, Duration::ZERO);
        }
        if self.state.tool != tool {
            info!(%tool, "tool selected");
        }
        self.state.tool = tool;
    }

    /// Make `color` the primary color and push it to the recent strip.
    pub fn select_color(&mut self, color: impl Into<Color>) {
        let color = color.into();
        if let Err(e) = color.to_rgba() {
            warn!(color = %color, error = %e, "selected color will render as fallback");
        }
        self.palette.record(&color);
        self.state.color = color;
    }

    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo().cloned();
        match restored {
            Some(snapshot) => {
                self.restore(snapshot);
                debug!(index = self.history.index(), "undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo().cloned();
        match restored {
            Some(snapshot) => {
                self.restore(snapshot);
                debug!(index = self.history.index(), "redo");
                true
            }
            None => false,
        }
    }

    /// Snapshots taken before a resize are refitted to the current layout.
    fn restore(&mut self, snapshot: PixelGrid) {
        self.preview.clear();
        self.grid = if (snapshot.rows(), snapshot.cols()) == (self.layout.rows, self.layout.cols) {
            snapshot
        } else {
            snapshot.resized(self.layout.rows, self.layout.cols)
        };
    }

    fn commit(&mut self) {
        self.history.commit(&self.grid);
        self.commits += 1;
    }

    /// Switch to a grid with `rows` rows. Starts a fresh drawing and history.
    pub fn set_rows(&mut self, rows: usize) -> bool {
        let rows = rows.max(1);
        if rows == self.layout.rows {
            return false;
        }
        if !self.config.canvas.size_presets.contains(&rows) {
            debug!(rows, "row count is not one of the size presets");
        }
        self.gesture = Gesture::Idle;
        self.preview.clear();
        self.state.anchor = None;
        self.moves.cancel();

        self.layout = GridLayout::compute(self.surface.0, self.surface.1, rows, &self.config.canvas);
        self.grid = PixelGrid::new(self.layout.rows, self.layout.cols);
        self.history.reset(&self.grid);
        info!(rows = self.layout.rows, cols = self.layout.cols, "grid size changed");
        true
    }

    /// Change the on-screen cell size; the grid itself is unchanged.
    pub fn set_zoom(&mut self, pixel_size: i32) {
        self.layout = self.layout.zoomed(pixel_size, self.config.canvas.min_pixel_size);
        debug!(pixel_size = self.layout.pixel_size, "zoom");
    }

    pub fn zoom_by(&mut self, delta: i32) {
        let current = i32::try_from(self.layout.pixel_size).unwrap_or(i32::MAX);
        self.set_zoom(current.saturating_add(delta));
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    /// Replace the drawing with a blank grid of the same size and commit.
    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.preview.clear();
        self.state.anchor = None;
        self.moves.cancel();
        self.grid = PixelGrid::new(self.layout.rows, self.layout.cols);
        self.commit();
        info!("grid cleared");
    }

    /// Start holding the clear button; [`Editor::tick`] clears once the hold completes.
    pub fn press_clear(&mut self, now: Duration) {
        self.clear_hold.press(now);
    }

    pub fn release_clear(&mut self) {
        self.clear_hold.release();
    }

    /// Run the shortcut bound to `press`, if any.
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<Action> {
        let action = action_for(press)?;
        match action {
            Action::SelectTool(tool) => self.select_tool(tool),
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::ToggleGrid => {
                self.toggle_grid();
            }
        }
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Duration = Duration::ZERO;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn editor(rows: usize, cols: usize) -> Editor {
        Editor::with_grid_size(EditorConfig::default(), rows, cols, 10)
    }

    #[test]
    fn test_with_grid_size_hits_dimensions() {
        let ed = editor(4, 7);
        assert_eq!((ed.grid().rows(), ed.grid().cols()), (4, 7));
        assert_eq!(ed.layout().pixel_size, 10);
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_pencil_stroke_interpolates() {
        let mut ed = editor(8, 8);
        ed.pointer_down(0, 0, T0);
        ed.pointer_move(5, 0, ms(1));
        assert!(ed.pointer_up(Some((5, 0)), ms(2)));
        for x in 0..=5 {
            assert!(ed.grid().get(x, 0).is_some(), "gap at {}", x);
        }
        assert_eq!(ed.grid().painted_count(), 6);
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_eraser_clears() {
        let mut ed = editor(4, 4);
        ed.pointer_down(1, 1, T0);
        ed.pointer_up(Some((1, 1)), T0);
        ed.select_tool(Tool::Eraser);
        ed.pointer_down(1, 1, T0);
        assert!(ed.pointer_up(Some((1, 1)), T0));
        assert!(ed.grid().is_empty());
        assert_eq!(ed.history().len(), 3);
    }

    #[test]
    fn test_no_change_no_commit() {
        let mut ed = editor(4, 4);
        ed.select_tool(Tool::Eraser);
        ed.pointer_down(2, 2, T0);
        assert!(!ed.pointer_up(Some((2, 2)), T0));
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_line_previews_then_commits() {
        let mut ed = editor(6, 6);
        ed.select_tool(Tool::Line);
        ed.pointer_down(0, 0, T0);
        ed.pointer_move(5, 0, ms(5));
        assert_eq!(ed.preview().len(), 6);
        assert!(ed.grid().is_empty(), "preview must not write");
        assert!(ed.pointer_up(Some((5, 0)), ms(10)));
        assert!(ed.preview().is_empty());
        assert_eq!(ed.grid().painted_count(), 6);
    }

    #[test]
    fn test_shape_leave_commits_at_last_pointer() {
        let mut ed = editor(4, 4);
        ed.select_tool(Tool::Rectangle);
        ed.pointer_down(0, 0, T0);
        ed.pointer_move(3, 3, ms(1));
        assert!(ed.pointer_leave(None, ms(2)));
        assert_eq!(ed.grid().painted_count(), 12);
        assert!(!ed.is_dragging());
        assert!(ed.preview().is_empty());
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_shape_leave_at_reported_position() {
        let mut ed = editor(6, 6);
        ed.select_tool(Tool::Line);
        ed.pointer_down(0, 0, T0);
        ed.pointer_move(2, 0, ms(1));
        assert!(ed.pointer_leave(Some((9, 0)), ms(2)));
        assert_eq!(ed.grid().painted_count(), 6, "clamped to the last column");
    }

    #[test]
    fn test_shape_up_without_position_drops_shape() {
        let mut ed = editor(6, 6);
        ed.select_tool(Tool::Circle);
        ed.pointer_down(3, 3, T0);
        ed.pointer_move(5, 3, ms(1));
        assert!(!ed.preview().is_empty());
        assert!(!ed.pointer_up(None, ms(2)));
        assert!(ed.grid().is_empty());
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_tool_switch_mid_drag_commits_shape() {
        let mut ed = editor(4, 4);
        ed.select_tool(Tool::Line);
        ed.pointer_down(0, 1, T0);
        ed.pointer_move(3, 1, ms(1));
        ed.select_tool(Tool::Pencil);
        assert!(!ed.is_dragging());
        assert_eq!(ed.grid().painted_count(), 4);
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_fill_commits_once_and_is_idempotent() {
        let mut ed = editor(3, 3);
        ed.select_tool(Tool::Fill);
        assert!(ed.pointer_down(1, 1, T0));
        assert!(!ed.is_dragging());
        assert_eq!(ed.grid().painted_count(), 9);
        assert_eq!(ed.history().len(), 2);

        assert!(!ed.pointer_down(1, 1, ms(1)));
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_eyedropper_picks_without_commit() {
        let mut ed = editor(3, 3);
        ed.select_color("#123456");
        ed.pointer_down(0, 0, T0);
        ed.pointer_up(Some((0, 0)), T0);
        ed.select_color("#ffffff");
        ed.select_tool(Tool::Eyedropper);

        let before = ed.history().len();
        assert!(ed.pointer_down(0, 0, ms(1)));
        assert_eq!(ed.color().as_str(), "#123456");
        assert!(!ed.pointer_down(2, 2, ms(2)), "empty cell keeps the color");
        assert_eq!(ed.color().as_str(), "#123456");
        assert_eq!(ed.history().len(), before);
        assert_eq!(ed.palette().recent().latest().map(Color::as_str), Some("#123456"));
    }

    #[test]
    fn test_selected_swatch_follows_color() {
        let mut ed = editor(2, 2);
        ed.select_color("#FF6B6B");
        assert_eq!(ed.selected_swatch(), Some(0));
        assert_eq!(ed.palette().swatches()[0].as_str(), "#ff6b6b");
        ed.select_color("#123456");
        assert_eq!(ed.selected_swatch(), None);
    }

    #[test]
    fn test_move_debounce_collapses_to_last() {
        let mut config = EditorConfig::default();
        config.timing.move_debounce_ms = 16;
        let mut ed = Editor::with_grid_size(config, 6, 6, 10);
        ed.select_tool(Tool::Rectangle);
        ed.pointer_down(0, 0, T0);
        assert!(!ed.pointer_move(2, 2, ms(1)));
        assert!(!ed.pointer_move(4, 4, ms(5)));
        assert!(!ed.tick(ms(10)));
        assert!(ed.tick(ms(21)));
        assert_eq!(ed.preview().len(), 16, "5x5 outline");
    }

    #[test]
    fn test_pending_move_flushed_on_up() {
        let mut config = EditorConfig::default();
        config.timing.move_debounce_ms = 100;
        let mut ed = Editor::with_grid_size(config, 4, 6, 10);
        ed.pointer_down(0, 0, T0);
        ed.pointer_move(3, 0, ms(1));
        ed.pointer_leave(None, ms(2));
        assert_eq!(ed.grid().painted_count(), 4);
        assert!(!ed.has_pending_timers());
    }

    #[test]
    fn test_out_of_range_pointer_clamped() {
        let mut ed = editor(4, 4);
        ed.pointer_down(-5, 99, T0);
        ed.pointer_up(None, T0);
        assert!(ed.grid().get(0, 3).is_some());
    }

    #[test]
    fn test_grid_pos_maps_and_clamps() {
        let ed = editor(4, 5);
        assert_eq!(ed.grid_pos(0.0, 0.0), (0, 0));
        assert_eq!(ed.grid_pos(19.9, 31.0), (1, 3));
        assert_eq!(ed.grid_pos(1000.0, -3.0), (4, 0));
        assert_eq!(ed.grid_pos(f64::NAN, f64::INFINITY), (0, 0));
    }

    #[test]
    fn test_undo_redo() {
        let mut ed = editor(4, 4);
        let before = ed.grid().clone();
        ed.pointer_down(1, 2, T0);
        ed.pointer_up(Some((1, 2)), T0);
        let after = ed.grid().clone();

        assert!(ed.undo());
        assert_eq!(ed.grid(), &before);
        assert!(!ed.undo());
        assert!(ed.redo());
        assert_eq!(ed.grid(), &after);
        assert!(!ed.redo());
    }

    #[test]
    fn test_set_rows_resets_history() {
        let mut ed = editor(4, 4);
        ed.pointer_down(0, 0, T0);
        ed.pointer_up(None, T0);
        assert!(!ed.set_rows(4));
        assert!(ed.set_rows(8));
        assert_eq!(ed.grid().rows(), 8);
        assert!(ed.grid().is_empty());
        assert_eq!(ed.history().len(), 1);
        assert!(!ed.undo());
    }

    #[test]
    fn test_zoom_clamped_and_grid_kept() {
        let mut ed = editor(4, 4);
        let dims = (ed.grid().rows(), ed.grid().cols());
        ed.set_zoom(1);
        assert_eq!(ed.layout().pixel_size, 4);
        ed.set_zoom(1000);
        assert_eq!(ed.layout().pixel_size, ed.layout().max_zoom);
        ed.zoom_by(-2);
        assert_eq!(ed.layout().pixel_size, ed.layout().max_zoom - 2);
        assert_eq!((ed.grid().rows(), ed.grid().cols()), dims);
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_hold_to_clear() {
        let mut ed = editor(3, 3);
        ed.pointer_down(0, 0, T0);
        ed.pointer_up(None, T0);

        ed.press_clear(ms(100));
        ed.release_clear();
        assert!(!ed.tick(ms(2000)));
        assert!(!ed.grid().is_empty());

        ed.press_clear(ms(3000));
        assert!(!ed.tick(ms(3500)));
        assert!(ed.tick(ms(3800)));
        assert!(ed.grid().is_empty());
        assert_eq!(ed.history().len(), 3);
    }

    #[test]
    fn test_resize_preserves_cells() {
        let mut ed = editor(4, 4);
        ed.pointer_down(1, 1, T0);
        ed.pointer_up(None, T0);
        ed.request_resize(10.0 * 8.0 + 24.0, 10.0 * 4.0 + 24.0, ms(10));
        assert_eq!(ed.grid().cols(), 4, "debounced");
        assert!(ed.tick(ms(160)));
        assert_eq!(ed.grid().cols(), 8);
        assert!(ed.grid().get(1, 1).is_some());
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn test_keys_route_to_actions() {
        let mut ed = editor(4, 4);
        assert_eq!(ed.handle_key(&KeyPress::new("r")), Some(Action::SelectTool(Tool::Rectangle)));
        assert_eq!(ed.tool(), Tool::Rectangle);
        let shown = ed.show_grid();
        ed.handle_key(&KeyPress::new("G"));
        assert_eq!(ed.show_grid(), !shown);
        assert_eq!(ed.handle_key(&KeyPress::new("q")), None);
    }

    #[test]
    fn test_render_size_tracks_zoom() {
        let mut ed = editor(3, 5);
        assert_eq!(ed.render().dimensions(), (50, 30));
        ed.set_zoom(8);
        assert_eq!(ed.render().dimensions(), (40, 24));
    }
}
