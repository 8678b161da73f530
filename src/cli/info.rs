//! Informational commands: shortcuts, palette and tools

use std::path::Path;
use std::process::ExitCode;

use crate::color::css_rgb;
use crate::config::load_config;
use crate::keymap::shortcut_table;
use crate::tools::Tool;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the keys command
pub fn run_keys() -> ExitCode {
    println!("Keyboard shortcuts:");
    for (keys, description) in shortcut_table() {
        println!("  {:<8} {}", keys, description);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the palette command
pub fn run_palette(config_path: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    println!("Palette ({} swatches):", config.palette.colors.len());
    for (i, color) in config.palette.colors.iter().enumerate() {
        match css_rgb(color) {
            Some(rgb) => println!("  {:>2}  {:<9} {}", i, color, rgb),
            None => println!("  {:>2}  {}", i, color),
        }
    }
    println!();
    println!("Initial color: {}", config.palette.initial_color);
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the tools command
pub fn run_tools() -> ExitCode {
    println!("Tools:");
    for tool in Tool::ALL {
        println!("  {}  {:<11} cursor: {}", tool.hotkey().to_ascii_uppercase(), tool.name(), tool.cursor());
    }
    ExitCode::from(EXIT_SUCCESS)
}
