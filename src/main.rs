//! Pixelpad - command-line host for replaying pixel art sessions

use std::process::ExitCode;

use pixelpad::cli;

fn main() -> ExitCode {
    cli::run()
}
