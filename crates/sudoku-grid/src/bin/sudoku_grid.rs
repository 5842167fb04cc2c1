//! Locate the Sudoku grid in a photograph and write the rectified grid.
//!
//! ```bash
//! sudoku-grid --input puzzle.jpg --output grid.png
//! sudoku-grid --input puzzle.jpg --output grid.png --config params.json --report report.json -v
//! sudoku-grid --input puzzle.jpg --output grid.png --overlay lines.png
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use sudoku_grid::detect::{self, DetectError};
use sudoku_grid::GridDetectorParams;

#[derive(Parser, Debug)]
#[command(name = "sudoku-grid")]
#[command(version, about = "Locate and rectify a Sudoku grid", long_about = None)]
struct Args {
    /// Input image (any format supported by `image`)
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG for the rectified grid
    #[arg(short, long)]
    output: PathBuf,

    /// JSON file with `GridDetectorParams`; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON detection report here
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Write the input with the selected boundary lines drawn on it
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("detection failed: {0}")]
    Detect(#[from] DetectError),
    #[error("failed to encode report: {0}")]
    Report(serde_json::Error),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    #[cfg(feature = "tracing")]
    {
        sudoku_grid::core::init_tracing(false);
        let _ = tracing_log::LogTracer::init();
        log::set_max_level(level);
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = sudoku_grid::core::init_from_env(level);
    }
}

fn load_params(path: Option<&Path>) -> Result<GridDetectorParams, CliError> {
    let Some(path) = path else {
        return Ok(GridDetectorParams::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<(), CliError> {
    let params = load_params(args.config.as_deref())?;

    let img = image::open(&args.input)
        .map_err(|source| CliError::Image {
            path: args.input.clone(),
            source,
        })?
        .to_luma8();
    log::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        img.width(),
        img.height()
    );

    let result = detect::extract_sudoku_grid(&img, params)?;
    if let Some(flag) = result.non_square() {
        log::warn!(
            "grid region is {}x{}, not square within {}",
            flag.width,
            flag.height,
            flag.tolerance
        );
    }

    detect::to_image(&result.rectified)
        .save(&args.output)
        .map_err(|source| CliError::Image {
            path: args.output.clone(),
            source,
        })?;
    log::info!(
        "wrote {}x{} grid to {}",
        result.rectified.width,
        result.rectified.height,
        args.output.display()
    );

    if let Some(path) = &args.overlay {
        detect::draw_boundary(&img, &result, 128)
            .save(path)
            .map_err(|source| CliError::Image {
                path: path.clone(),
                source,
            })?;
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&result.report()).map_err(CliError::Report)?;
        std::fs::write(path, json).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
