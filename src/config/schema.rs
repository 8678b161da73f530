//! Configuration schema types for `pixelpad.toml`
//!
//! Every section and field is optional; missing values take the defaults of
//! the stock editor (16 rows, 50 undo steps, the 32-swatch palette).

use serde::{Deserialize, Serialize};

use crate::palette::DEFAULT_PALETTE;

/// Canvas sizing and display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Number of grid rows at startup
    pub rows: usize,
    /// Row counts offered by the size selector
    pub size_presets: Vec<usize>,
    /// Smallest cell edge in surface pixels (also the zoom floor)
    pub min_pixel_size: u32,
    /// The zoom ceiling is never lower than this
    pub max_zoom_floor: u32,
    /// Space reserved around the drawing surface
    pub surface_margin: u32,
    /// Draw grid lines at startup
    pub show_grid: bool,
    /// Grid lines are hidden below this pixel size
    pub grid_line_min_pixel_size: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            rows: 16,
            size_presets: vec![16, 32, 64],
            min_pixel_size: 4,
            max_zoom_floor: 40,
            surface_margin: 24,
            show_grid: true,
            grid_line_min_pixel_size: 6,
        }
    }
}

/// Undo history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

/// Palette and recent colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Swatches in display order
    pub colors: Vec<String>,
    /// Length of the recent-colors strip
    pub recent_capacity: usize,
    /// Color selected at startup
    pub initial_color: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            recent_capacity: 8,
            initial_color: "#ff6b6b".to_string(),
        }
    }
}

/// Debounce and hold delays, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a pointer move is applied (0 applies immediately)
    pub move_debounce_ms: u64,
    /// Delay before a surface resize re-lays out the grid
    pub resize_debounce_ms: u64,
    /// How long the clear button must be held
    pub clear_hold_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { move_debounce_ms: 0, resize_debounce_ms: 150, clear_hold_ms: 800 }
    }
}

/// PNG export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// The longer grid side is upscaled toward this many pixels
    pub target_size: u32,
    /// Exported files are named `{prefix}-{cols}x{rows}.png`
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { target_size: 512, file_prefix: "pixel-art".to_string() }
    }
}

/// Complete pixelpad.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub history: HistoryConfig,
    pub palette: PaletteConfig,
    pub timing: TimingConfig,
    pub export: ExportConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "history.capacity")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pixelpad.toml: '{}' {}", self.field, self.message)
    }
}

impl EditorConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: u64| {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        };

        positive("canvas.rows", self.canvas.rows as u64);
        positive("canvas.min_pixel_size", u64::from(self.canvas.min_pixel_size));
        positive("history.capacity", self.history.capacity as u64);
        positive("palette.recent_capacity", self.palette.recent_capacity as u64);
        positive("export.target_size", u64::from(self.export.target_size));

        if self.canvas.size_presets.iter().any(|&r| r == 0) {
            errors.push(ConfigValidationError {
                field: "canvas.size_presets".to_string(),
                message: "row counts must be positive".to_string(),
            });
        }

        if self.palette.initial_color.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "palette.initial_color".to_string(),
                message: "must be a non-empty color".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
