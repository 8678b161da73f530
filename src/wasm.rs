//! WASM API module for browser/JS interop
//!
//! Exposes [`Editor`] to a browser page. The page forwards canvas pointer
//! events in surface pixels together with `performance.now()`, calls `tick`
//! from `requestAnimationFrame`, and blits `render_rgba()` into an
//! `ImageData` of `width` x `height`.

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::keymap::KeyPress;
use crate::numeric::coerce_f64;
use crate::tools::Tool;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Milliseconds from `performance.now()` as a clock reading. Negative or
/// non-finite values read as 0.
fn millis(now_ms: f64) -> Duration {
    Duration::from_secs_f64(coerce_f64(now_ms).max(0.0) / 1000.0)
}

/// A pixel-art editor bound to one canvas element.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor for a container of `width` x `height` CSS pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, rows: u32) -> WasmEditor {
        let mut config = EditorConfig::default();
        if rows > 0 {
            config.canvas.rows = rows as usize;
        }
        WasmEditor { editor: Editor::new(config, width, height) }
    }

    /// Canvas width in pixels at the current zoom
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.editor.layout().surface_size().0
    }

    /// Canvas height in pixels at the current zoom
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.editor.layout().surface_size().1
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> u32 {
        self.editor.grid().rows() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> u32 {
        self.editor.grid().cols() as u32
    }

    #[wasm_bindgen(getter, js_name = pixelSize)]
    pub fn pixel_size(&self) -> u32 {
        self.editor.layout().pixel_size
    }

    #[wasm_bindgen(getter, js_name = maxZoom)]
    pub fn max_zoom(&self) -> u32 {
        self.editor.layout().max_zoom
    }

    /// CSS cursor for the active tool
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> String {
        self.editor.tool().cursor().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.editor.color().to_string()
    }

    #[wasm_bindgen(getter, js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.editor.history().can_undo()
    }

    #[wasm_bindgen(getter, js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.editor.history().can_redo()
    }

    /// Palette swatches in display order
    pub fn swatches(&self) -> Vec<String> {
        self.editor.palette().swatches().iter().map(|c| c.to_string()).collect()
    }

    /// Index of the swatch to highlight for the current color, if any
    #[wasm_bindgen(getter, js_name = selectedSwatch)]
    pub fn selected_swatch(&self) -> Option<u32> {
        self.editor.selected_swatch().map(|i| i as u32)
    }

    /// Recently used colors, most recent first
    #[wasm_bindgen(js_name = recentColors)]
    pub fn recent_colors(&self) -> Vec<String> {
        self.editor.palette().recent().iter().map(|c| c.to_string()).collect()
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        let (col, row) = self.editor.grid_pos(x, y);
        self.editor.pointer_down(col, row, millis(now_ms))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        let (col, row) = self.editor.grid_pos(x, y);
        self.editor.pointer_move(col, row, millis(now_ms))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        let pos = self.editor.grid_pos(x, y);
        self.editor.pointer_up(Some(pos), millis(now_ms))
    }

    /// The pointer left the canvas at surface position (x, y); clamped into the grid.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, x: f64, y: f64, now_ms: f64) -> bool {
        let pos = self.editor.grid_pos(x, y);
        self.editor.pointer_leave(Some(pos), millis(now_ms))
    }

    /// Fire due timers; true when the canvas should be redrawn.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.editor.tick(millis(now_ms))
    }

    /// Select a tool by name; unknown names are ignored and return false.
    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&mut self, name: &str) -> bool {
        match name.parse::<Tool>() {
            Ok(tool) => {
                self.editor.select_tool(tool);
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = selectColor)]
    pub fn select_color(&mut self, color: &str) {
        self.editor.select_color(color);
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    #[wasm_bindgen(js_name = setRows)]
    pub fn set_rows(&mut self, rows: u32) -> bool {
        self.editor.set_rows(rows as usize)
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, pixel_size: f64) {
        self.editor.set_zoom(crate::numeric::coerce_i32(pixel_size));
    }

    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&mut self, delta: i32) {
        self.editor.zoom_by(delta);
    }

    #[wasm_bindgen(js_name = toggleGrid)]
    pub fn toggle_grid(&mut self) -> bool {
        self.editor.toggle_grid()
    }

    pub fn clear(&mut self) {
        self.editor.clear();
    }

    #[wasm_bindgen(js_name = pressClear)]
    pub fn press_clear(&mut self, now_ms: f64) {
        self.editor.press_clear(millis(now_ms));
    }

    #[wasm_bindgen(js_name = releaseClear)]
    pub fn release_clear(&mut self) {
        self.editor.release_clear();
    }

    #[wasm_bindgen(js_name = clearProgress)]
    pub fn clear_progress(&self, now_ms: f64) -> f32 {
        self.editor.clear_progress(millis(now_ms))
    }

    pub fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
        self.editor.request_resize(width, height, millis(now_ms));
    }

    /// Handle a keydown; returns true when it mapped to a shortcut.
    pub fn key(&mut self, key: &str, ctrl: bool, in_text_input: bool) -> bool {
        let press = KeyPress { key: key.to_string(), ctrl, in_text_input };
        self.editor.handle_key(&press).is_some()
    }

    /// Full redraw as raw RGBA bytes (4 bytes per pixel)
    #[wasm_bindgen(js_name = renderRgba)]
    pub fn render_rgba(&self) -> Vec<u8> {
        self.editor.render().into_raw()
    }

    /// Export as PNG bytes, or an empty array if encoding fails
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self) -> Vec<u8> {
        self.editor.export().to_png().unwrap_or_default()
    }

    /// Download name for the export, e.g. `pixel-art-24x16.png`
    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        crate::export::export_file_name(
            &self.editor.config().export.file_prefix,
            self.editor.grid().cols(),
            self.editor.grid().rows(),
        )
    }
}
