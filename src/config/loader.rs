//! Configuration loading and discovery for `pixelpad.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::EditorConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = "pixelpad.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pixelpad.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the starting row count
    pub rows: Option<usize>,
    /// Override the undo history capacity
    pub history: Option<usize>,
    /// Override grid line display
    pub show_grid: Option<bool>,
    /// Override the export target size
    pub export_size: Option<u32>,
}

/// Locate the config file for the current directory.
///
/// The nearest `pixelpad.toml` in the current directory or one of its
/// ancestors wins; otherwise the per-user file from [`find_xdg_config`].
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from).or_else(find_xdg_config)
}

/// `$XDG_CONFIG_HOME/pixelpad/pixelpad.toml`, falling back to
/// `~/.config/pixelpad/pixelpad.toml`, if it exists.
pub fn find_xdg_config() -> Option<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("pixelpad").join(CONFIG_FILE_NAME)).filter(|p| p.is_file())
}

/// Nearest `pixelpad.toml` in `start` or any of its ancestors.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|p| p.is_file())
}

/// Load the editor configuration.
///
/// An explicit `path` must exist. Without one the file is discovered with
/// [`find_config`], and when none is found the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let Some(path) = path.map(Path::to_path_buf).or_else(find_config) else {
        tracing::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
        return Ok(EditorConfig::default());
    };

    tracing::debug!(path = %path.display(), "loading config");
    let config: EditorConfig = toml::from_str(&fs::read_to_string(&path)?)?;

    let problems: Vec<String> = config.validate().iter().map(ToString::to_string).collect();
    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(problems))
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Zero values are
/// ignored so an override can never produce an invalid configuration.
pub fn merge_cli_overrides(config: &mut EditorConfig, overrides: &CliOverrides) {
    if let Some(rows) = overrides.rows.filter(|&r| r > 0) {
        config.canvas.rows = rows;
    }

    if let Some(capacity) = overrides.history.filter(|&c| c > 0) {
        config.history.capacity = capacity;
    }

    if let Some(show_grid) = overrides.show_grid {
        config.canvas.show_grid = show_grid;
    }

    if let Some(size) = overrides.export_size.filter(|&s| s > 0) {
        config.export.target_size = size;
    }
}
