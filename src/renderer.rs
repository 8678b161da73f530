//! Canvas rendering to image buffers
//!
//! Every render is a full redraw of the on-screen surface: a two-tone
//! checkerboard behind each cell, the cell color on top, and optional grid
//! lines. Shape tools draw their preview by rendering the committed grid and
//! painting the preview cells over it; nothing is written to the grid.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::grid::PixelGrid;

/// Light checkerboard square
pub const CHECKER_LIGHT: Rgba<u8> = Rgba([0xf1, 0xf3, 0xf8, 255]);

/// Dark checkerboard square
pub const CHECKER_DARK: Rgba<u8> = Rgba([0xe2, 0xe6, 0xf0, 255]);

/// Grid line color, rgba(41, 121, 255, 0.18)
pub const GRID_LINE: Rgba<u8> = Rgba([41, 121, 255, 46]);

/// Eraser preview, half-transparent white
pub const ERASER_PREVIEW: Rgba<u8> = Rgba([255, 255, 255, 128]);

/// Surface rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Edge length of one cell in surface pixels
    pub pixel_size: u32,
    /// Whether grid lines are wanted
    pub show_grid: bool,
    /// Grid lines are skipped below this pixel size
    pub grid_line_min_pixel_size: u32,
}

impl RenderOptions {
    /// Grid lines are drawn only when wanted and legible.
    pub fn draws_grid_lines(&self) -> bool {
        self.show_grid && self.pixel_size >= self.grid_line_min_pixel_size
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { pixel_size: 16, show_grid: true, grid_line_min_pixel_size: 6 }
    }
}

/// How preview cells are painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewInk {
    /// Opaque current color
    Color(Color),
    /// Translucent white marking cells about to be cleared
    Eraser,
}

/// Composite `src` over `dst` (source-over).
pub fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    // Output alpha scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| {
        let num = u32::from(s) * sa * 255 + u32::from(d) * da * (255 - sa);
        ((num + out_a / 2) / out_a) as u8
    };
    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        ((out_a + 127) / 255) as u8,
    ])
}

/// Render the grid onto a fresh surface of `cols * pixel_size` by `rows * pixel_size`.
pub fn render_canvas(grid: &PixelGrid, opts: &RenderOptions) -> RgbaImage {
    let ps = opts.pixel_size.max(1);
    let mut image = RgbaImage::new(grid.cols() as u32 * ps, grid.rows() as u32 * ps);
    let mut color_cache: HashMap<&Color, Rgba<u8>> = HashMap::new();

    for (row, cells) in grid.iter_rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let fill = cell
                .as_ref()
                .map(|color| *color_cache.entry(color).or_insert_with(|| color.to_rgba_lenient()));
            paint_cell(&mut image, col as u32, row as u32, ps, fill);
        }
    }

    if opts.draws_grid_lines() {
        draw_grid_lines(&mut image, ps);
    }

    image
}

/// Render the grid with transient preview cells painted on top.
///
/// Points outside the grid are skipped. The grid itself is left untouched.
pub fn render_preview(
    grid: &PixelGrid,
    opts: &RenderOptions,
    points: &[(i32, i32)],
    ink: &PreviewInk,
) -> RgbaImage {
    let mut image = render_canvas(grid, opts);
    let ps = opts.pixel_size.max(1);
    let rgba = match ink {
        PreviewInk::Color(color) => color.to_rgba_lenient(),
        PreviewInk::Eraser => ERASER_PREVIEW,
    };

    for &(x, y) in points {
        if grid.contains(x, y) {
            fill_square(&mut image, x as u32 * ps, y as u32 * ps, ps, rgba);
        }
    }

    image
}

/// Checkerboard quadrants, then the cell color blended over them.
fn paint_cell(image: &mut RgbaImage, col: u32, row: u32, ps: u32, fill: Option<Rgba<u8>>) {
    let (ox, oy) = (col * ps, row * ps);
    for dy in 0..ps {
        for dx in 0..ps {
            let quadrant = u32::from(2 * dx >= ps) + u32::from(2 * dy >= ps);
            let checker = if quadrant % 2 == 0 { CHECKER_LIGHT } else { CHECKER_DARK };
            let px = match fill {
                Some(color) => blend(checker, color),
                None => checker,
            };
            image.put_pixel(ox + dx, oy + dy, px);
        }
    }
}

fn fill_square(image: &mut RgbaImage, ox: u32, oy: u32, size: u32, color: Rgba<u8>) {
    for y in oy..(oy + size).min(image.height()) {
        for x in ox..(ox + size).min(image.width()) {
            let under = *image.get_pixel(x, y);
            image.put_pixel(x, y, blend(under, color));
        }
    }
}

/// One-pixel lines along the top and left edge of every cell.
fn draw_grid_lines(image: &mut RgbaImage, ps: u32) {
    let (w, h) = image.dimensions();
    for y in 0..h {
        for x in 0..w {
            if x % ps == 0 || y % ps == 0 {
                let under = *image.get_pixel(x, y);
                image.put_pixel(x, y, blend(under, GRID_LINE));
            }
        }
    }
}
