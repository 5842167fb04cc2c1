//! Sudoku grid detection pipeline.
//!
//! This module wires together coarse region location, line classification,
//! boundary selection, corner solving and perspective rectification.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::GridDetectError;
pub use params::{GridDetectorParams, WarpSource};
pub use pipeline::SudokuGridDetector;
pub use result::{GridDetectionReport, GridDetectionResult, LocatedRegion};
