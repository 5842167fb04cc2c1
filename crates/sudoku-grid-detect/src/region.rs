//! Coarse localization of the grid by band scanning.
//!
//! The scan runs on an edge map. Starting one third in from each side it
//! walks outward and stops at the first column (or row) whose central band
//! holds no pixel of the `background` value; inside the grid every such band
//! crosses at least one grid line.

use std::fmt;

use serde::{Deserialize, Serialize};
use sudoku_grid_core::{GrayImage, GrayImageView};

use crate::GridDetectError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    /// Pixel value the band test looks for (edge pixels of the edge map).
    pub background: u8,
    /// Outward padding added to every side of the found box, pixels.
    pub margin: i64,
    /// Largest accepted `|width - height|` before flagging a non-square box.
    pub squareness_tolerance: i64,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            background: 255,
            margin: 5,
            squareness_tolerance: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Pixel bounds of the coarse grid region, `[left, right) x [top, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBox {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

/// Advisory: the located box is far from square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonSquareRegion {
    pub width: i64,
    pub height: i64,
    pub tolerance: i64,
}

impl NonSquareRegion {
    pub fn difference(&self) -> i64 {
        (self.width - self.height).abs()
    }
}

impl RegionBox {
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            left: 0,
            right: width as i64,
            top: 0,
            bottom: height as i64,
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.bottom > self.top
    }

    pub fn expanded(&self, margin: i64) -> Self {
        Self {
            left: self.left - margin,
            right: self.right + margin,
            top: self.top - margin,
            bottom: self.bottom + margin,
        }
    }

    /// `Some` when `|width - height|` exceeds `tolerance`.
    pub fn squareness_check(&self, tolerance: i64) -> Option<NonSquareRegion> {
        let (width, height) = (self.width(), self.height());
        ((width - height).abs() > tolerance).then_some(NonSquareRegion {
            width,
            height,
            tolerance,
        })
    }

    /// Intersection with a `width x height` image.
    pub fn clamped(&self, width: usize, height: usize) -> Self {
        let (w, h) = (width as i64, height as i64);
        Self {
            left: self.left.clamp(0, w),
            right: self.right.clamp(0, w),
            top: self.top.clamp(0, h),
            bottom: self.bottom.clamp(0, h),
        }
    }

    /// Copy the part of `image` covered by this box.
    pub fn crop(&self, image: &GrayImageView<'_>) -> Result<GrayImage, GridDetectError> {
        let b = self.clamped(image.width, image.height);
        if !b.is_valid() {
            return Err(GridDetectError::EmptyRegion { region: *self });
        }
        Ok(image.crop(
            b.left as usize,
            b.top as usize,
            b.width() as usize,
            b.height() as usize,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionEstimate {
    /// Box including the margin, not yet clamped to the image.
    pub region: RegionBox,
    pub non_square: Option<NonSquareRegion>,
}

/// Central band: `[2n/5, 3n/5)`.
#[inline]
fn central_band(n: usize) -> std::ops::Range<usize> {
    2 * n / 5..3 * n / 5
}

fn column_is_clear(image: &GrayImageView<'_>, x: usize, background: u8) -> bool {
    let band = central_band(image.height);
    !band.is_empty()
        && band
            .into_iter()
            .all(|y| image.get(x, y).is_some_and(|v| v != background))
}

fn row_is_clear(image: &GrayImageView<'_>, y: usize, background: u8) -> bool {
    let band = central_band(image.width);
    !band.is_empty()
        && band
            .into_iter()
            .all(|x| image.get(x, y).is_some_and(|v| v != background))
}

/// First clear column/row walking outward from the inner third on `side`.
pub fn find_border(image: &GrayImageView<'_>, side: Side, background: u8) -> Option<i64> {
    let (w, h) = (image.width, image.height);
    let found = match side {
        Side::Left => (0..=w / 3)
            .rev()
            .find(|&x| column_is_clear(image, x, background)),
        Side::Right => (2 * w / 3..w).find(|&x| column_is_clear(image, x, background)),
        Side::Top => (0..=h / 3)
            .rev()
            .find(|&y| row_is_clear(image, y, background)),
        Side::Bottom => (2 * h / 3..h).find(|&y| row_is_clear(image, y, background)),
    };
    found.map(|v| v as i64)
}

/// Estimate the grid's bounding box on an edge map.
pub fn locate_region(
    image: &GrayImageView<'_>,
    params: &RegionParams,
) -> Result<RegionEstimate, GridDetectError> {
    let border = |side| {
        find_border(image, side, params.background).ok_or_else(|| {
            log::debug!("boundary not found: side {side}");
            GridDetectError::BoundaryNotFound { side }
        })
    };

    let region = RegionBox {
        left: border(Side::Left)?,
        right: border(Side::Right)?,
        top: border(Side::Top)?,
        bottom: border(Side::Bottom)?,
    }
    .expanded(params.margin);

    let non_square = region.squareness_check(params.squareness_tolerance);
    if let Some(ns) = &non_square {
        log::warn!(
            "coarse region is not square: {}x{} differs by {} (tolerance {})",
            ns.width,
            ns.height,
            ns.difference(),
            ns.tolerance
        );
    }
    log::debug!(
        "coarse region: left={} right={} top={} bottom={}",
        region.left,
        region.right,
        region.top,
        region.bottom
    );

    Ok(RegionEstimate { region, non_square })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Black canvas with a 10 px lattice of white lines over `[lo, hi]^2`.
    fn lattice_canvas(side: usize, lo: usize, hi: usize) -> GrayImage {
        let mut img = GrayImage::new(side, side);
        for y in lo..=hi {
            for x in lo..=hi {
                if (x - lo) % 10 == 0 || (y - lo) % 10 == 0 {
                    img.set(x, y, 255);
                }
            }
        }
        img
    }

    #[test]
    fn finds_lattice_bounds_plus_margin() {
        let img = lattice_canvas(300, 60, 240);
        let est = locate_region(&img.view(), &RegionParams::default()).expect("region");
        assert_eq!(
            est.region,
            RegionBox {
                left: 59 - 5,
                right: 241 + 5,
                top: 59 - 5,
                bottom: 241 + 5,
            }
        );
        assert!(est.non_square.is_none());
    }

    #[test]
    fn missing_border_names_the_side() {
        // lattice runs off the right edge of the canvas
        let img = lattice_canvas(300, 60, 299);
        let err = locate_region(&img.view(), &RegionParams::default()).unwrap_err();
        assert!(matches!(
            err,
            GridDetectError::BoundaryNotFound { side: Side::Right }
        ));
    }

    #[test]
    fn all_background_canvas_has_no_border() {
        let img = GrayImage::filled(60, 60, 255);
        assert_eq!(find_border(&img.view(), Side::Left, 255), None);
        assert_eq!(find_border(&img.view(), Side::Bottom, 255), None);
    }

    #[test]
    fn empty_image_has_no_border() {
        let img = GrayImage::new(0, 0);
        assert_eq!(find_border(&img.view(), Side::Top, 255), None);
    }

    #[test]
    fn squareness_tolerance_is_inclusive() {
        let b = RegionBox {
            left: 0,
            right: 90,
            top: 0,
            bottom: 50,
        };
        assert!(b.squareness_check(50).is_none());
        let flagged = b.squareness_check(30).expect("non-square");
        assert_eq!(flagged.difference(), 40);
    }

    #[test]
    fn wide_lattice_is_flagged_but_still_located() {
        let mut img = GrayImage::new(400, 300);
        for y in 60..=240usize {
            for x in 20..=380usize {
                if (x - 20) % 10 == 0 || (y - 60) % 10 == 0 {
                    img.set(x, y, 255);
                }
            }
        }
        let est = locate_region(&img.view(), &RegionParams::default()).expect("region");
        assert_eq!(est.region.width(), 381 - 19 + 10);
        assert_eq!(est.region.height(), 241 - 59 + 10);
        assert!(est.non_square.is_some());
    }

    #[test]
    fn crop_clamps_margin_to_image() {
        let img = GrayImage::filled(20, 20, 7);
        let b = RegionBox {
            left: -5,
            right: 12,
            top: 3,
            bottom: 30,
        };
        let c = b.crop(&img.view()).expect("crop");
        assert_eq!((c.width, c.height), (12, 17));
    }

    #[test]
    fn crop_outside_image_is_empty() {
        let img = GrayImage::new(10, 10);
        let b = RegionBox {
            left: 20,
            right: 30,
            top: 0,
            bottom: 5,
        };
        assert!(matches!(
            b.crop(&img.view()),
            Err(GridDetectError::EmptyRegion { .. })
        ));
    }
}
