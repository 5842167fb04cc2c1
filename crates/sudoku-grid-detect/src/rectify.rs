//! Perspective rectification of the detected grid quadrilateral.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use sudoku_grid_core::{homography_from_4pt, GrayImage, GrayImageView, Homography, Point2D};

use crate::corners::CornerSet;
use crate::ops::{ImageOps, WarpError};
use crate::GridDetectError;

/// How detected corners are assigned to the corners of the output rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerMapping {
    /// Quarter turn clockwise: topLeft→topRight, topRight→bottomRight,
    /// bottomLeft→topLeft, bottomRight→bottomLeft. Compensates for frames
    /// delivered in sensor orientation.
    #[default]
    Rotated90,
    /// Every corner maps to the same-named corner of the output.
    Identity,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Output `[width, height]`; `None` keeps the size of the cropped region.
    pub output_size: Option<[usize; 2]>,
    pub corner_mapping: CornerMapping,
}

/// Point lists handed to the warp; `src[i]` is sent to `dst[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub src: [Point2D; 4],
    pub dst: [Point2D; 4],
}

/// Build the corner correspondence for a `width x height` target.
///
/// Source order is always `[topLeft, topRight, bottomLeft, bottomRight]`.
pub fn correspondence(
    corners: &CornerSet,
    width: usize,
    height: usize,
    mapping: CornerMapping,
) -> Correspondence {
    let (w, h) = (width as f64, height as f64);
    let rect_tl = Point2::new(0.0, 0.0);
    let rect_tr = Point2::new(w, 0.0);
    let rect_bl = Point2::new(0.0, h);
    let rect_br = Point2::new(w, h);

    let dst = match mapping {
        CornerMapping::Rotated90 => [rect_tr, rect_br, rect_tl, rect_bl],
        CornerMapping::Identity => [rect_tl, rect_tr, rect_bl, rect_br],
    };

    Correspondence {
        src: corners.to_array(),
        dst,
    }
}

#[derive(Clone, Debug)]
pub struct RectifiedGrid {
    pub image: GrayImage,
    pub correspondence: Correspondence,
    /// Maps rectified pixel coordinates back into the source image.
    pub h_src_from_rect: Homography,
}

/// Warp `image` so the quadrilateral spanned by `corners` fills an
/// axis-aligned rectangle.
pub fn rectify_grid<O: ImageOps + ?Sized>(
    ops: &O,
    image: &GrayImageView<'_>,
    corners: &CornerSet,
    params: &RectifyParams,
) -> Result<RectifiedGrid, GridDetectError> {
    let [width, height] = params.output_size.unwrap_or([image.width, image.height]);
    let correspondence = correspondence(corners, width, height, params.corner_mapping);

    let rectified = ops
        .warp_perspective(
            image,
            &correspondence.src,
            &correspondence.dst,
            (width, height),
        )
        .map_err(|err| match err {
            WarpError::Degenerate => GridDetectError::DegenerateCorrespondence,
            WarpError::EmptyOutput { width, height } => {
                GridDetectError::InvalidOutputSize { width, height }
            }
        })?;

    let h_src_from_rect = homography_from_4pt(&correspondence.dst, &correspondence.src)
        .ok_or(GridDetectError::DegenerateCorrespondence)?;

    log::debug!(
        "rectified {}x{} -> {}x{} ({:?})",
        image.width,
        image.height,
        width,
        height,
        params.corner_mapping
    );

    Ok(RectifiedGrid {
        image: rectified,
        correspondence,
        h_src_from_rect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{EdgeParams, MorphologyParams, SegmentParams};
    use sudoku_grid_core::LineSegment;

    struct DefaultWarp;

    impl ImageOps for DefaultWarp {
        fn edge_map(&self, image: &GrayImageView<'_>, _: &EdgeParams) -> GrayImage {
            image.to_image()
        }

        fn detect_segments(&self, _: &GrayImageView<'_>, _: &SegmentParams) -> Vec<LineSegment> {
            Vec::new()
        }

        fn morphology(&self, image: &GrayImageView<'_>, _: &MorphologyParams) -> GrayImage {
            image.to_image()
        }
    }

    fn square_corners(side: f64) -> CornerSet {
        CornerSet {
            top_left: Point2::new(0.0, 0.0),
            top_right: Point2::new(side, 0.0),
            bottom_left: Point2::new(0.0, side),
            bottom_right: Point2::new(side, side),
        }
    }

    /// Ten-pixel lattice of bright lines on black.
    fn lattice(side: usize) -> GrayImage {
        let mut img = GrayImage::new(side, side);
        for y in 0..side {
            for x in 0..side {
                if x % 10 == 0 || y % 10 == 0 {
                    img.set(x, y, 255);
                }
            }
        }
        img
    }

    #[test]
    fn rotated_mapping_is_pinned() {
        let c = CornerSet {
            top_left: Point2::new(12.0, 9.0),
            top_right: Point2::new(88.0, 14.0),
            bottom_left: Point2::new(8.0, 91.0),
            bottom_right: Point2::new(93.0, 87.0),
        };
        let corr = correspondence(&c, 200, 100, CornerMapping::Rotated90);
        assert_eq!(corr.src, [c.top_left, c.top_right, c.bottom_left, c.bottom_right]);
        assert_eq!(
            corr.dst,
            [
                Point2::new(200.0, 0.0),
                Point2::new(200.0, 100.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 100.0),
            ]
        );
    }

    #[test]
    fn identity_mapping_keeps_corner_names() {
        let corr = correspondence(&square_corners(50.0), 50, 50, CornerMapping::Identity);
        assert_eq!(corr.src, corr.dst);
    }

    #[test]
    fn self_correspondence_is_a_no_op() {
        let img = lattice(60);
        let params = RectifyParams {
            output_size: None,
            corner_mapping: CornerMapping::Identity,
        };
        let out = rectify_grid(&DefaultWarp, &img.view(), &square_corners(60.0), &params)
            .expect("rectified");
        assert_eq!(out.image, img);
    }

    #[test]
    fn rotated_mapping_turns_content_clockwise() {
        let mut img = GrayImage::new(40, 40);
        // bright block in the top-left quadrant
        img.fill_rect(0, 0, 20, 20, 255);
        let out = rectify_grid(
            &DefaultWarp,
            &img.view(),
            &square_corners(40.0),
            &RectifyParams::default(),
        )
        .expect("rectified");
        // after a clockwise quarter turn it sits top-right
        assert_eq!(out.image.get(30, 5), Some(255));
        assert_eq!(out.image.get(5, 5), Some(0));
        assert_eq!(out.image.get(30, 30), Some(0));
    }

    #[test]
    fn back_projection_lands_on_detected_corners() {
        let img = lattice(80);
        let corners = CornerSet {
            top_left: Point2::new(5.0, 7.0),
            top_right: Point2::new(74.0, 3.0),
            bottom_left: Point2::new(2.0, 77.0),
            bottom_right: Point2::new(78.0, 72.0),
        };
        let params = RectifyParams {
            output_size: Some([90, 90]),
            corner_mapping: CornerMapping::Rotated90,
        };
        let out = rectify_grid(&DefaultWarp, &img.view(), &corners, &params).expect("rectified");
        assert_eq!((out.image.width, out.image.height), (90, 90));
        let back = out.h_src_from_rect.apply(Point2::new(90.0, 0.0));
        assert!((back - corners.top_left).norm() < 1e-6);
    }

    #[test]
    fn collapsed_corners_are_degenerate() {
        let img = lattice(20);
        let p = Point2::new(4.0, 4.0);
        let corners = CornerSet {
            top_left: p,
            top_right: p,
            bottom_left: Point2::new(0.0, 10.0),
            bottom_right: Point2::new(10.0, 10.0),
        };
        let err = rectify_grid(&DefaultWarp, &img.view(), &corners, &RectifyParams::default())
            .unwrap_err();
        assert!(matches!(err, GridDetectError::DegenerateCorrespondence));
    }
}
