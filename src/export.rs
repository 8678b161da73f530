//! PNG export of the grid
//!
//! Export ignores the on-screen zoom, checkerboard and grid lines: each cell
//! becomes a `scale x scale` block, transparent cells stay transparent, and
//! the scale is chosen so the longer side of the grid approaches a target
//! size.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::grid::PixelGrid;

/// Error type for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Integer upscale factor: `max(1, target / max(cols, rows))`.
///
/// # Examples
///
/// ```
/// use pixelpad::export::export_scale;
///
/// assert_eq!(export_scale(16, 16, 512), 32);
/// assert_eq!(export_scale(48, 32, 512), 10);
/// assert_eq!(export_scale(1024, 64, 512), 1);
/// ```
pub fn export_scale(cols: usize, rows: usize, target: u32) -> u32 {
    let longest = cols.max(rows).max(1) as u64;
    (u64::from(target) / longest).clamp(1, u64::from(u32::MAX)) as u32
}

/// File name for an export, e.g. `pixel-art-24x16.png`.
pub fn export_file_name(prefix: &str, cols: usize, rows: usize) -> String {
    format!("{}-{}x{}.png", prefix, cols, rows)
}

/// One pixel per cell, painted cells only.
fn rasterize_cells(grid: &PixelGrid) -> RgbaImage {
    let mut image = RgbaImage::new(grid.cols() as u32, grid.rows() as u32);
    for (x, y, color) in grid.iter_painted() {
        image.put_pixel(x, y, color.to_rgba_lenient());
    }
    image
}

/// Nearest-neighbor upscale by an integer factor.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Rasterize the grid at `scale`, painting only colored cells.
pub fn rasterize_export(grid: &PixelGrid, scale: u32) -> RgbaImage {
    scale_image(rasterize_cells(grid), scale)
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// A finished export, ready for the host to download or save.
#[derive(Debug, Clone)]
pub struct ExportImage {
    pub file_name: String,
    pub scale: u32,
    pub image: RgbaImage,
}

impl ExportImage {
    /// Export `grid` toward `target_size` pixels on its longer side.
    pub fn from_grid(grid: &PixelGrid, target_size: u32, file_prefix: &str) -> Self {
        let scale = export_scale(grid.cols(), grid.rows(), target_size);
        tracing::info!(cols = grid.cols(), rows = grid.rows(), scale, "exporting grid");
        Self {
            file_name: export_file_name(file_prefix, grid.cols(), grid.rows()),
            scale,
            image: rasterize_export(grid, scale),
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        encode_png(&self.image)
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        save_png(&self.image, path)
    }
}
