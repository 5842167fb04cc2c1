use serde::{Deserialize, Serialize};
use sudoku_grid_core::{GrayImage, Homography};

use crate::boundary::BoundaryQuad;
use crate::corners::CornerSet;
use crate::lines::ClassifiedLines;
use crate::rectify::Correspondence;
use crate::region::{NonSquareRegion, RegionBox, RegionEstimate};

/// Output of the coarse phase: the cropped working images.
#[derive(Clone, Debug)]
pub struct LocatedRegion {
    pub estimate: RegionEstimate,
    /// Estimate clamped to the frame; origin of the crop in frame coordinates.
    pub bounds: RegionBox,
    /// Grayscale input cropped to `bounds`.
    pub gray: GrayImage,
    /// Edge map of `gray`.
    pub edges: GrayImage,
}

/// Output of a full detection run.
#[derive(Clone, Debug)]
pub struct GridDetectionResult {
    pub rectified: GrayImage,
    pub region: RegionEstimate,
    /// Crop bounds in frame coordinates.
    pub bounds: RegionBox,
    pub lines: ClassifiedLines,
    /// Boundary lines in crop coordinates.
    pub boundary: BoundaryQuad,
    /// Grid corners in crop coordinates.
    pub corners: CornerSet,
    pub correspondence: Correspondence,
    /// Maps rectified pixels back into crop coordinates.
    pub h_crop_from_rect: Homography,
}

impl GridDetectionResult {
    /// Grid corners in full-frame coordinates.
    pub fn corners_in_frame(&self) -> CornerSet {
        self.corners
            .translated(self.bounds.left as f64, self.bounds.top as f64)
    }

    /// Advisory raised by the coarse phase, if any.
    pub fn non_square(&self) -> Option<&NonSquareRegion> {
        self.region.non_square.as_ref()
    }

    pub fn report(&self) -> GridDetectionReport {
        let corners = self.corners_in_frame();
        GridDetectionReport {
            region: self.region.region,
            bounds: self.bounds,
            non_square: self.region.non_square,
            horizontal_lines: self.lines.horizontal.len(),
            vertical_lines: self.lines.vertical.len(),
            discarded_lines: self.lines.discarded,
            boundary: self.boundary,
            corners,
            rectified_size: [self.rectified.width, self.rectified.height],
            h_crop_from_rect: self.h_crop_from_rect.to_array(),
        }
    }
}

/// Serializable summary of a detection run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridDetectionReport {
    pub region: RegionBox,
    pub bounds: RegionBox,
    pub non_square: Option<NonSquareRegion>,
    pub horizontal_lines: usize,
    pub vertical_lines: usize,
    pub discarded_lines: usize,
    pub boundary: BoundaryQuad,
    /// Frame coordinates.
    pub corners: CornerSet,
    pub rectified_size: [usize; 2],
    pub h_crop_from_rect: [[f64; 3]; 3],
}
