//! High-level facade crate for the `sudoku-grid-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core geometry crate and the grid detector
//! - (feature-gated) an [`ImageOps`](grid::ImageOps) backend built on
//!   `imageproc` plus end-to-end helpers that take an `image::GrayImage`
//!   and return the rectified grid.
//!
//! ## Quickstart
//!
//! ```no_run
//! use sudoku_grid::detect;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("puzzle.jpg")?.decode()?.to_luma8();
//! let result = detect::extract_sudoku_grid_default(&img)?;
//! detect::to_image(&result.rectified).save("grid.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `sudoku_grid::core`: line segments, grayscale images, homographies, logging.
//! - `sudoku_grid::grid`: region scan, line classification, boundary/corner
//!   solving, rectification and the two-phase detector.
//! - `sudoku_grid::detect` (feature `image`): end-to-end helpers on `image::GrayImage`.

pub use sudoku_grid_core as core;
pub use sudoku_grid_detect as grid;

pub use sudoku_grid_detect::{
    GridDetectError, GridDetectionReport, GridDetectionResult, GridDetectorParams,
    SudokuGridDetector,
};

#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
mod ops;

#[cfg(feature = "image")]
pub use ops::ImageprocOps;
