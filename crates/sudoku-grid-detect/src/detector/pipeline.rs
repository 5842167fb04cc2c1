use sudoku_grid_core::GrayImageView;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{GridDetectError, GridDetectionResult, GridDetectorParams, LocatedRegion, WarpSource};
use crate::boundary::select_boundary_lines;
use crate::corners::solve_corners;
use crate::lines::classify_lines;
use crate::ops::ImageOps;
use crate::rectify::rectify_grid;
use crate::region::{locate_region, RegionBox, RegionEstimate};

/// Two-phase Sudoku grid detector.
///
/// [`locate`](Self::locate) crops the frame to the coarse grid region;
/// [`detect_and_rectify`](Self::detect_and_rectify) finds the boundary lines
/// in the crop and warps the grid to an axis-aligned image. The detector
/// holds no per-run state, so one instance can serve many frames.
pub struct SudokuGridDetector<O> {
    ops: O,
    params: GridDetectorParams,
}

impl<O: ImageOps> SudokuGridDetector<O> {
    pub fn new(ops: O, params: GridDetectorParams) -> Self {
        Self { ops, params }
    }

    #[inline]
    pub fn params(&self) -> &GridDetectorParams {
        &self.params
    }

    #[inline]
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Phase one: edge-map the frame, scan for the grid region and crop it.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn locate(&self, image: &GrayImageView<'_>) -> Result<LocatedRegion, GridDetectError> {
        let p = &self.params;

        if !p.locate_region {
            let bounds = RegionBox::full(image.width, image.height);
            if !bounds.is_valid() {
                return Err(GridDetectError::EmptyRegion { region: bounds });
            }
            return Ok(LocatedRegion {
                estimate: RegionEstimate {
                    region: bounds,
                    non_square: None,
                },
                bounds,
                gray: image.to_image(),
                edges: self.ops.edge_map(image, &p.edges),
            });
        }

        let frame_edges = self.ops.edge_map(image, &p.edges);
        let estimate = locate_region(&frame_edges.view(), &p.region)?;
        let gray = estimate.region.crop(image)?;
        let bounds = estimate.region.clamped(image.width, image.height);
        let edges = self.ops.edge_map(&gray.view(), &p.edges);

        log::debug!(
            "cropped {}x{} frame to {}x{} at ({}, {})",
            image.width,
            image.height,
            gray.width,
            gray.height,
            bounds.left,
            bounds.top
        );

        Ok(LocatedRegion {
            estimate,
            bounds,
            gray,
            edges,
        })
    }

    /// Phase two: lines → boundary → corners → rectified grid.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, region),
            fields(width = region.edges.width, height = region.edges.height)
        )
    )]
    pub fn detect_and_rectify(
        &self,
        region: &LocatedRegion,
    ) -> Result<GridDetectionResult, GridDetectError> {
        let p = &self.params;

        let segments = self.ops.detect_segments(&region.edges.view(), &p.segments);
        let lines = classify_lines(&segments);
        let boundary = select_boundary_lines(&lines.horizontal, &lines.vertical)?;
        let corners = solve_corners(&boundary, p.parallel_tolerance)?;

        let source = match p.warp_source {
            WarpSource::EdgeMap => &region.edges,
            WarpSource::Grayscale => &region.gray,
        };
        let rectified = rectify_grid(&self.ops, &source.view(), &corners, &p.rectify)?;

        let image = p.cleanup.iter().fold(rectified.image, |img, step| {
            self.ops.morphology(&img.view(), step)
        });

        Ok(GridDetectionResult {
            rectified: image,
            region: region.estimate,
            bounds: region.bounds,
            lines,
            boundary,
            corners,
            correspondence: rectified.correspondence,
            h_crop_from_rect: rectified.h_src_from_rect,
        })
    }

    /// Run both phases on one frame.
    pub fn detect(&self, image: &GrayImageView<'_>) -> Result<GridDetectionResult, GridDetectError> {
        let region = self.locate(image)?;
        self.detect_and_rectify(&region)
    }
}
