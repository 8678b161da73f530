//! The pixel grid: the canonical raster state being edited.
//!
//! Cells hold an optional [`Color`]; `None` is transparent. The grid uses
//! `(x, y)` coordinates where `(0, 0)` is top-left, x is the column, and y is
//! the row. Coordinates are signed so that points produced by the shape
//! rasterizers can be written directly: anything outside the grid is
//! silently ignored.

use std::collections::{HashSet, VecDeque};

use crate::color::Color;
use crate::config::CanvasConfig;
use crate::shapes::Bounds;

/// A rows x cols matrix of nullable colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    /// Row-major cells, `cells[y * cols + x]`.
    cells: Vec<Option<Color>>,
    cols: usize,
    rows: usize,
}

impl PixelGrid {
    /// Create an all-transparent grid. Both dimensions are at least 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self { cells: vec![None; rows * cols], cols, rows }
    }

    /// Grid width (number of columns).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid height (number of rows).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `(cols, rows)` as signed bounds for the shape rasterizers.
    pub fn bounds(&self) -> Bounds {
        (self.cols as i32, self.rows as i32)
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.cols && y >= 0 && (y as usize) < self.rows
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y).then(|| y as usize * self.cols + x as usize)
    }

    /// Get the color at (x, y). Returns `None` for transparent or out-of-bounds cells.
    pub fn get(&self, x: i32, y: i32) -> Option<&Color> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    ///
    /// Returns whether the cell was inside the grid.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: Option<Color>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Write the same value to every point, skipping those outside the grid.
    ///
    /// Returns the number of cells whose value changed.
    pub fn apply(&mut self, points: &[(i32, i32)], value: Option<&Color>) -> usize {
        let mut changed = 0;
        for &(x, y) in points {
            if let Some(i) = self.index(x, y) {
                if self.cells[i].as_ref() != value {
                    self.cells[i] = value.cloned();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Reset every cell to transparent.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// True if no cell has a color.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Number of cells with a color.
    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.cols)
    }

    /// Iterate the colored cells as `(x, y, color)`.
    pub fn iter_painted(&self) -> impl Iterator<Item = (u32, u32, &Color)> {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.as_ref().map(|color| ((i % cols) as u32, (i / cols) as u32, color))
        })
    }

    /// Copy of this grid with new dimensions, keeping the overlapping
    /// top-left region. New cells are transparent.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let mut out = Self::new(rows, cols);
        for y in 0..self.rows.min(out.rows) {
            for x in 0..self.cols.min(out.cols) {
                out.cells[y * out.cols + x] = self.cells[y * self.cols + x].clone();
            }
        }
        out
    }

    /// Flood fill from a seed point using iterative BFS.
    ///
    /// Replaces every cell 4-connected to the seed that shares the seed's
    /// original value (transparent counts as a value). Filling with the value
    /// already at the seed, or seeding outside the grid, is a no-op.
    ///
    /// Returns the number of cells changed.
    pub fn flood_fill(&mut self, x: i32, y: i32, fill: Option<&Color>) -> usize {
        let Some(seed) = self.index(x, y) else {
            return 0;
        };
        let target = self.cells[seed].clone();
        if target.as_ref() == fill {
            return 0;
        }

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        queue.push_back((x, y));
        visited.insert((x, y));

        let mut filled = 0;
        while let Some((cx, cy)) = queue.pop_front() {
            self.set_pixel(cx, cy, fill.cloned());
            filled += 1;

            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if let Some(i) = self.index(nx, ny) {
                    if self.cells[i] == target && visited.insert((nx, ny)) {
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        filled
    }
}

/// Largest usable surface side in pixels; bigger surfaces are treated as this.
pub const MAX_SURFACE_SIDE: u32 = 8192;

/// How the grid maps onto the host's drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    /// Edge length of one cell in surface pixels.
    pub pixel_size: u32,
    /// Largest pixel size the zoom control may reach.
    pub max_zoom: u32,
}

impl GridLayout {
    /// Fit `rows` rows into the available surface and derive the column count.
    ///
    /// The pixel size is however many surface pixels each row gets vertically
    /// (never below `min_pixel_size`); columns fill the available width at that
    /// pixel size. Non-positive or non-finite surface sizes behave as zero,
    /// and each usable side is capped at [`MAX_SURFACE_SIDE`].
    pub fn compute(avail_w: f64, avail_h: f64, rows: usize, config: &CanvasConfig) -> Self {
        let rows = rows.max(1);
        let margin = f64::from(config.surface_margin);
        let usable = |avail: f64| {
            let side = (crate::numeric::coerce_f64(avail) - margin).floor();
            side.clamp(0.0, f64::from(MAX_SURFACE_SIDE)) as u32
        };
        let (usable_w, usable_h) = (usable(avail_w), usable(avail_h));

        let fitted = u32::try_from(usable_h as usize / rows).unwrap_or(u32::MAX);
        let pixel_size = fitted.max(config.min_pixel_size).max(1);
        let cols = ((usable_w / pixel_size) as usize).max(1);
        let max_zoom = fitted.max(config.max_zoom_floor);

        Self { rows, cols, pixel_size, max_zoom }
    }

    /// Surface size in pixels: `(cols * pixel_size, rows * pixel_size)`.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.cols as u32 * self.pixel_size, self.rows as u32 * self.pixel_size)
    }

    /// Same layout at a different zoom, clamped to `[min, max_zoom]`.
    pub fn zoomed(&self, pixel_size: i32, min_pixel_size: u32) -> Self {
        let clamped = pixel_size.clamp(min_pixel_size as i32, self.max_zoom.max(min_pixel_size) as i32);
        Self { pixel_size: clamped as u32, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::new("#ff0000")
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = PixelGrid::new(4, 6);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 6);
        assert!(grid.is_empty());
        assert_eq!(grid.iter_rows().count(), 4);
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let grid = PixelGrid::new(0, 0);
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
    }

    #[test]
    fn test_set_and_get_in_bounds() {
        let mut grid = PixelGrid::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                assert!(grid.set_pixel(x, y, Some(Color::new(format!("#{}{}0", x, y)))));
            }
        }
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(grid.get(x, y).map(Color::as_str), Some(format!("#{}{}0", x, y).as_str()));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut grid = PixelGrid::new(3, 3);
        let before = grid.clone();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 3), (i32::MAX, i32::MIN)] {
            assert!(!grid.set_pixel(x, y, Some(red())));
        }
        assert_eq!(grid, before);
        assert_eq!(grid.get(5, 5), None);
    }

    #[test]
    fn test_erase_sets_transparent() {
        let mut grid = PixelGrid::new(2, 2);
        grid.set_pixel(1, 1, Some(red()));
        grid.set_pixel(1, 1, None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_apply_clips() {
        let mut grid = PixelGrid::new(2, 2);
        let written = grid.apply(&[(0, 0), (1, 1), (2, 2), (-1, 0)], Some(&red()));
        assert_eq!(written, 2);
        assert_eq!(grid.painted_count(), 2);
        assert_eq!(grid.apply(&[(0, 0), (0, 1)], Some(&red())), 1, "unchanged cells not counted");
    }

    #[test]
    fn test_iter_painted() {
        let mut grid = PixelGrid::new(2, 3);
        grid.set_pixel(2, 1, Some(red()));
        let painted: Vec<_> = grid.iter_painted().map(|(x, y, c)| (x, y, c.clone())).collect();
        assert_eq!(painted, vec![(2, 1, red())]);
    }

    #[test]
    fn test_resized_preserves_overlap() {
        let mut grid = PixelGrid::new(2, 2);
        grid.set_pixel(0, 0, Some(red()));
        grid.set_pixel(1, 1, Some(red()));

        let bigger = grid.resized(3, 4);
        assert_eq!((bigger.rows(), bigger.cols()), (3, 4));
        assert_eq!(bigger.get(0, 0), Some(&red()));
        assert_eq!(bigger.get(1, 1), Some(&red()));
        assert_eq!(bigger.painted_count(), 2);

        let smaller = grid.resized(1, 1);
        assert_eq!(smaller.painted_count(), 1);
    }

    #[test]
    fn test_flood_fill_region() {
        // Vertical wall at x = 2 splits a 5x3 grid
        let mut grid = PixelGrid::new(3, 5);
        for y in 0..3 {
            grid.set_pixel(2, y, Some(Color::new("#000")));
        }
        let filled = grid.flood_fill(0, 0, Some(&red()));
        assert_eq!(filled, 6);
        assert_eq!(grid.get(1, 2), Some(&red()));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(2, 1), Some(&Color::new("#000")));
    }

    #[test]
    fn test_flood_fill_is_idempotent() {
        let mut grid = PixelGrid::new(4, 4);
        grid.set_pixel(1, 1, Some(Color::new("#000")));
        assert_eq!(grid.flood_fill(0, 0, Some(&red())), 15);
        let after_first = grid.clone();
        assert_eq!(grid.flood_fill(0, 0, Some(&red())), 0);
        assert_eq!(grid, after_first);
    }

    #[test]
    fn test_flood_fill_does_not_cross_diagonals() {
        let mut grid = PixelGrid::new(2, 2);
        grid.set_pixel(1, 0, Some(Color::new("#000")));
        grid.set_pixel(0, 1, Some(Color::new("#000")));
        assert_eq!(grid.flood_fill(0, 0, Some(&red())), 1);
        assert_eq!(grid.get(1, 1), None);
    }

    #[test]
    fn test_flood_fill_with_none_erases_region() {
        let mut grid = PixelGrid::new(3, 3);
        grid.flood_fill(0, 0, Some(&red()));
        assert_eq!(grid.flood_fill(1, 1, None), 9);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_flood_fill_single_cell_and_out_of_bounds() {
        let mut grid = PixelGrid::new(1, 1);
        assert_eq!(grid.flood_fill(0, 0, Some(&red())), 1);
        assert_eq!(grid.flood_fill(5, 5, Some(&Color::new("#000"))), 0);
    }

    #[test]
    fn test_flood_fill_large_grid_no_recursion_limit() {
        let mut grid = PixelGrid::new(256, 256);
        assert_eq!(grid.flood_fill(128, 128, Some(&red())), 256 * 256);
    }

    #[test]
    fn test_layout_compute() {
        let config = CanvasConfig::default();
        // 24px margin: 800x536 -> 776x512 usable; 16 rows -> 32px cells, 24 cols
        let layout = GridLayout::compute(800.0, 536.0, 16, &config);
        assert_eq!(layout.pixel_size, 32);
        assert_eq!(layout.cols, 24);
        assert_eq!(layout.rows, 16);
        assert_eq!(layout.max_zoom, 40);
        assert_eq!(layout.surface_size(), (768, 512));
    }

    #[test]
    fn test_layout_tiny_surface() {
        let config = CanvasConfig::default();
        let layout = GridLayout::compute(10.0, f64::NAN, 64, &config);
        assert_eq!(layout.pixel_size, config.min_pixel_size);
        assert_eq!(layout.cols, 1);
        assert_eq!(layout.max_zoom, config.max_zoom_floor);
    }

    #[test]
    fn test_layout_huge_surface_is_capped() {
        let config = CanvasConfig::default();
        let layout = GridLayout::compute(1e10, 1e10, 16, &config);
        assert_eq!(layout.pixel_size, MAX_SURFACE_SIDE / 16);
        assert_eq!(layout.cols, 16);
        assert_eq!(layout.surface_size(), (MAX_SURFACE_SIDE, MAX_SURFACE_SIDE));

        let single = GridLayout::compute(f64::MAX, f64::MAX, 1, &config);
        assert_eq!(single.pixel_size, MAX_SURFACE_SIDE);
        assert_eq!(single.max_zoom, MAX_SURFACE_SIDE);
    }

    #[test]
    fn test_layout_zoom_clamps() {
        let config = CanvasConfig::default();
        let layout = GridLayout::compute(800.0, 536.0, 16, &config);
        assert_eq!(layout.zoomed(100, 4).pixel_size, 40);
        assert_eq!(layout.zoomed(1, 4).pixel_size, 4);
        assert_eq!(layout.zoomed(12, 4).pixel_size, 12);
        assert_eq!(layout.zoomed(12, 4).cols, layout.cols);
    }
}
