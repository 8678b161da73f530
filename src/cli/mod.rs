//! Command-line interface implementation
//!
//! `pxpad` is a headless host for the editor: it replays recorded sessions
//! and writes the exported PNGs, and prints the shortcut and palette tables
//! a UI host would show.

mod info;
mod replay;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use replay::ReplayArgs;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding the log filter, e.g. `PXPAD_LOG=pixelpad=debug`.
pub const LOG_ENV: &str = "PXPAD_LOG";

/// Pixelpad - replay pixel art editing sessions and export PNG
#[derive(Parser)]
#[command(name = "pxpad")]
#[command(about = "Pixelpad - replay pixel art editing sessions and export them to PNG")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay session files against a fresh editor and export the result
    Replay {
        /// Session files (.json5, .jsonl) or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PNG file, or directory when replaying several sessions
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the on-screen render (checkerboard, grid lines)
        #[arg(long)]
        canvas: Option<PathBuf>,

        /// Grid rows at startup
        #[arg(long)]
        rows: Option<usize>,

        /// Host surface width in pixels
        #[arg(long, default_value = "800")]
        width: f64,

        /// Host surface height in pixels
        #[arg(long, default_value = "560")]
        height: f64,

        /// Undo history capacity
        #[arg(long)]
        history: Option<usize>,

        /// Start with grid lines hidden
        #[arg(long)]
        no_grid: bool,

        /// Export target size for the longer grid side
        #[arg(long)]
        export_size: Option<u32>,

        /// Fail on session warnings and unparseable colors
        #[arg(long)]
        strict: bool,

        /// Config file (default: discover pixelpad.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the keyboard shortcut table
    Keys,

    /// Print the swatch palette
    Palette {
        /// Config file (default: discover pixelpad.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List drawing tools with their hotkeys and cursors
    Tools,
}

/// Install the stderr log subscriber.
///
/// `PXPAD_LOG` takes precedence; otherwise `--verbose` selects debug output
/// and the default is warnings only.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "pixelpad=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when running inside tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Replay {
            inputs,
            output,
            canvas,
            rows,
            width,
            height,
            history,
            no_grid,
            export_size,
            strict,
            config,
        } => replay::run_replay(&ReplayArgs {
            inputs,
            output,
            canvas,
            rows,
            width,
            height,
            history,
            show_grid: if no_grid { Some(false) } else { None },
            export_size,
            strict,
            config,
        }),
        Commands::Keys => info::run_keys(),
        Commands::Palette { config } => info::run_palette(config.as_deref()),
        Commands::Tools => info::run_tools(),
    }
}
