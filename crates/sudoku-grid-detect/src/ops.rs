//! Image-processing services the pipeline consumes.
//!
//! Edge extraction, line detection and morphology are supplied by an
//! [`ImageOps`] backend. The perspective warp has a default implementation
//! built on the homography solver from `sudoku-grid-core`.

use serde::{Deserialize, Serialize};
use sudoku_grid_core::{
    homography_from_4pt, quad_is_degenerate, warp_perspective_gray, GrayImage, GrayImageView,
    LineSegment, Point2D,
};

/// Relative collinearity tolerance used when validating warp quads.
const COLLINEAR_TOL: f64 = 1e-9;

/// Thresholds for the Canny-style edge operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 200.0,
        }
    }
}

/// Parameters for the Hough-style segment detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Accumulator distance resolution, pixels.
    pub distance_resolution: f64,
    /// Accumulator angle resolution, radians.
    pub angle_resolution: f64,
    /// Minimum accumulator votes for a line.
    pub vote_threshold: u32,
    /// Non-maximum suppression radius in accumulator cells.
    pub suppression_radius: u32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            distance_resolution: 1.0,
            angle_resolution: std::f64::consts::PI / 180.0,
            vote_threshold: 150,
            suppression_radius: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelShape {
    Cross,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphOp {
    Erode,
    Dilate,
}

/// One structuring-element filter pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphologyParams {
    pub shape: KernelShape,
    /// Kernel side length in pixels.
    pub size: u8,
    pub op: MorphOp,
}

impl MorphologyParams {
    pub fn erode(size: u8) -> Self {
        Self {
            shape: KernelShape::Cross,
            size,
            op: MorphOp::Erode,
        }
    }

    pub fn dilate(size: u8) -> Self {
        Self {
            shape: KernelShape::Cross,
            size,
            op: MorphOp::Dilate,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WarpError {
    #[error("perspective correspondence is degenerate (three or more collinear points)")]
    Degenerate,
    #[error("requested output size {width}x{height} is empty")]
    EmptyOutput { width: usize, height: usize },
}

/// Backend for the primitive image operations of the pipeline.
///
/// Implementations must be synchronous and must not retain the buffers
/// they are given.
pub trait ImageOps {
    /// Binary edge map: edge pixels are 255, everything else 0.
    fn edge_map(&self, image: &GrayImageView<'_>, params: &EdgeParams) -> GrayImage;

    /// Straight segments found in a binary image. Order is unspecified.
    fn detect_segments(&self, edges: &GrayImageView<'_>, params: &SegmentParams)
        -> Vec<LineSegment>;

    fn morphology(&self, image: &GrayImageView<'_>, params: &MorphologyParams) -> GrayImage;

    /// Resample `image` so that `src_quad[i]` lands on `dst_quad[i]` in an
    /// image of `out_size = (width, height)`.
    fn warp_perspective(
        &self,
        image: &GrayImageView<'_>,
        src_quad: &[Point2D; 4],
        dst_quad: &[Point2D; 4],
        out_size: (usize, usize),
    ) -> Result<GrayImage, WarpError> {
        let (width, height) = out_size;
        if width == 0 || height == 0 {
            return Err(WarpError::EmptyOutput { width, height });
        }
        if quad_is_degenerate(src_quad, COLLINEAR_TOL)
            || quad_is_degenerate(dst_quad, COLLINEAR_TOL)
        {
            return Err(WarpError::Degenerate);
        }
        let h_src_from_dst = homography_from_4pt(dst_quad, src_quad).ok_or(WarpError::Degenerate)?;
        Ok(warp_perspective_gray(image, h_src_from_dst, width, height))
    }
}
