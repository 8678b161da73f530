//! Replay command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use glob::glob;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{load_config, merge_cli_overrides, CliOverrides, EditorConfig};
use crate::editor::Editor;
use crate::export::save_png;
use crate::session::{load_session, replay};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of `pxpad replay`.
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    pub inputs: Vec<String>,
    pub output: Option<PathBuf>,
    pub canvas: Option<PathBuf>,
    pub rows: Option<usize>,
    pub width: f64,
    pub height: f64,
    pub history: Option<usize>,
    pub show_grid: Option<bool>,
    pub export_size: Option<u32>,
    pub strict: bool,
    pub config: Option<PathBuf>,
}

/// What one replayed session produced.
#[derive(Debug)]
struct Replayed {
    input: PathBuf,
    export_path: PathBuf,
    canvas_path: Option<PathBuf>,
    events: usize,
    commits: usize,
    warnings: Vec<String>,
}

/// Expand glob patterns; plain paths are kept as given.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = match glob(pattern) {
            Ok(entries) => entries.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
            Err(e) => return Err(format!("Invalid pattern '{}': {}", pattern, e)),
        };
        if matches.is_empty() {
            return Err(format!("No session files match '{}'", pattern));
        }
        paths.extend(matches);
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Where to write an output: `target` as a file for a single session, as a
/// directory when there are several (or it already is one), else next to
/// the input.
fn output_path(target: Option<&Path>, input: &Path, name: &str, multiple: bool) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("session");
    let file_name = if multiple { format!("{}-{}", stem, name) } else { name.to_string() };

    match target {
        Some(dir) if multiple || dir.is_dir() || dir.to_string_lossy().ends_with('/') => dir.join(file_name),
        Some(file) => file.to_path_buf(),
        None => input.parent().map(|p| p.join(&file_name)).unwrap_or_else(|| PathBuf::from(file_name)),
    }
}

fn replay_one(
    input: &Path,
    config: &EditorConfig,
    args: &ReplayArgs,
    multiple: bool,
) -> Result<Replayed, String> {
    let parsed = load_session(input).map_err(|e| format!("{}: {}", input.display(), e))?;
    let mut warnings: Vec<String> = parsed
        .warnings
        .iter()
        .map(|w| format!("{}:{}: {}", input.display(), w.line, w.message))
        .collect();

    let mut editor = Editor::new(config.clone(), args.width, args.height);
    let report = replay(&mut editor, &parsed.events, Duration::ZERO);
    warnings.extend(report.issues.iter().map(|issue| format!("{}: {}", input.display(), issue)));

    if args.strict && !warnings.is_empty() {
        return Err(warnings.join("\n"));
    }

    let export = editor.export();
    let export_path = output_path(args.output.as_deref(), input, &export.file_name, multiple);
    export.save(&export_path).map_err(|e| format!("{}: {}", export_path.display(), e))?;

    let canvas_path = match args.canvas.as_deref() {
        Some(target) => {
            let path = output_path(Some(target), input, "canvas.png", multiple);
            save_png(&editor.render(), &path).map_err(|e| format!("{}: {}", path.display(), e))?;
            Some(path)
        }
        None => None,
    };

    info!(input = %input.display(), events = report.events, commits = report.commits, "session replayed");

    Ok(Replayed {
        input: input.to_path_buf(),
        export_path,
        canvas_path,
        events: report.events,
        commits: report.commits,
        warnings,
    })
}

/// Execute the replay command
pub fn run_replay(args: &ReplayArgs) -> ExitCode {
    if !(args.width.is_finite() && args.height.is_finite()) || args.width <= 0.0 || args.height <= 0.0 {
        eprintln!("Error: --width and --height must be positive numbers");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let inputs = match expand_inputs(&args.inputs) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(
        &mut config,
        &CliOverrides {
            rows: args.rows,
            history: args.history,
            show_grid: args.show_grid,
            export_size: args.export_size,
        },
    );

    let multiple = inputs.len() > 1;
    let results: Vec<Result<Replayed, String>> = if multiple {
        inputs.par_iter().map(|input| replay_one(input, &config, args, true)).collect()
    } else {
        inputs.iter().map(|input| replay_one(input, &config, args, false)).collect()
    };

    let mut failed = false;
    for result in results {
        match result {
            Ok(done) => {
                for warning in &done.warnings {
                    warn!("{}", warning);
                    eprintln!("Warning: {}", warning);
                }
                println!(
                    "{}: {} events, {} commits -> {}",
                    done.input.display(),
                    done.events,
                    done.commits,
                    done.export_path.display()
                );
                if let Some(canvas) = &done.canvas_path {
                    println!("  canvas -> {}", canvas.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
