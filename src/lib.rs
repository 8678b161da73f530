//! Pixelpad - grid pixel art editor engine
//!
//! This library provides:
//! - A nullable-color pixel grid with flood fill and content-preserving resize
//! - Raster algorithms for lines, rectangle outlines and circle outlines
//! - A full-redraw renderer with checkerboard, grid lines and shape previews
//! - An [`editor::Editor`] that maps pointer gestures and toolbar actions to
//!   grid edits, with bounded undo/redo history
//! - Upscaled PNG export
//! - Replay of recorded editing sessions, used by the `pxpad` CLI

pub mod cli;
pub mod color;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod export;
pub mod grid;
pub mod history;
pub mod keymap;
pub mod numeric;
pub mod palette;
pub mod renderer;
pub mod session;
pub mod shapes;
pub mod tools;

#[cfg(feature = "wasm")]
pub mod wasm;
