//! Sudoku grid localization and rectification built on `sudoku-grid-core`.
//!
//! ## Quickstart
//!
//! ```
//! use sudoku_grid_detect::{
//!     EdgeParams, GridDetectorParams, ImageOps, MorphologyParams, SegmentParams,
//!     SudokuGridDetector,
//! };
//! use sudoku_grid_core::{GrayImage, GrayImageView, LineSegment};
//!
//! struct NoLines;
//!
//! impl ImageOps for NoLines {
//!     fn edge_map(&self, image: &GrayImageView<'_>, _: &EdgeParams) -> GrayImage {
//!         image.to_image()
//!     }
//!     fn detect_segments(&self, _: &GrayImageView<'_>, _: &SegmentParams) -> Vec<LineSegment> {
//!         Vec::new()
//!     }
//!     fn morphology(&self, image: &GrayImageView<'_>, _: &MorphologyParams) -> GrayImage {
//!         image.to_image()
//!     }
//! }
//!
//! let detector = SudokuGridDetector::new(NoLines, GridDetectorParams::default());
//! let frame = GrayImage::new(64, 64);
//! assert!(detector.detect(&frame.view()).is_err());
//! ```
//!
//! Pipeline:
//! 1. Edge-map the frame and scan bands outward from the inner thirds to find
//!    a coarse bounding box ([`locate_region`]); pad it by a fixed margin.
//! 2. Crop the frame to that box and edge-map the crop again.
//! 3. Detect straight segments and split them by orientation ([`classify_lines`]).
//! 4. Keep the extremal line on each side ([`select_boundary_lines`]).
//! 5. Intersect adjacent boundary lines into four corners ([`solve_corners`]).
//! 6. Warp the corner quadrilateral onto an axis-aligned rectangle ([`rectify_grid`]).

mod boundary;
mod corners;
mod detector;
mod lines;
mod ops;
mod rectify;
mod region;

pub use boundary::{select_boundary_lines, BoundaryQuad, BoundaryRole};
pub use corners::{intersect_lines, solve_corners, CornerRole, CornerSet, DEFAULT_PARALLEL_TOLERANCE};
pub use detector::{
    GridDetectError, GridDetectionReport, GridDetectionResult, GridDetectorParams, LocatedRegion,
    SudokuGridDetector, WarpSource,
};
pub use lines::{classify_lines, segment_axis, Axis, ClassifiedLines, LineGroup, ORIENTATION_TOL};
pub use ops::{
    EdgeParams, ImageOps, KernelShape, MorphOp, MorphologyParams, SegmentParams, WarpError,
};
pub use rectify::{correspondence, rectify_grid, CornerMapping, Correspondence, RectifiedGrid, RectifyParams};
pub use region::{
    find_border, locate_region, NonSquareRegion, RegionBox, RegionEstimate, RegionParams, Side,
};
