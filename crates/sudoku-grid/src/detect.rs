use crate::core::{GrayImage, GrayImageView};
use crate::grid::{
    BoundaryRole, EdgeParams, GridDetectError, GridDetectionResult, GridDetectorParams, ImageOps,
    MorphologyParams, SudokuGridDetector,
};
use crate::ops::{to_image_gray, ImageprocOps};
use imageproc::drawing::draw_line_segment_mut;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Grid(#[from] GridDetectError),
}

/// Convert an `image::GrayImage` into the lightweight `sudoku-grid-core` view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Convert a `sudoku-grid-core` image back into an `image::GrayImage`.
pub fn to_image(img: &GrayImage) -> ::image::GrayImage {
    to_image_gray(&img.view())
}

/// Detector wired to the `imageproc` backend.
pub fn detector(params: GridDetectorParams) -> SudokuGridDetector<ImageprocOps> {
    SudokuGridDetector::new(ImageprocOps, params)
}

/// Locate the grid in `img` and return the rectified view.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn extract_sudoku_grid(
    img: &::image::GrayImage,
    params: GridDetectorParams,
) -> Result<GridDetectionResult, DetectError> {
    Ok(detector(params).detect(&gray_view(img))?)
}

/// Convenience overload using `GridDetectorParams::default()`.
pub fn extract_sudoku_grid_default(
    img: &::image::GrayImage,
) -> Result<GridDetectionResult, DetectError> {
    extract_sudoku_grid(img, GridDetectorParams::default())
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

pub fn extract_sudoku_grid_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: GridDetectorParams,
) -> Result<GridDetectionResult, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    extract_sudoku_grid(&img, params)
}

/// Erode with a cross kernel of side `size`.
pub fn erode(img: &::image::GrayImage, size: u8) -> ::image::GrayImage {
    let out = ImageprocOps.morphology(&gray_view(img), &MorphologyParams::erode(size));
    to_image(&out)
}

/// Dilate with a cross kernel of side `size`.
pub fn dilate(img: &::image::GrayImage, size: u8) -> ::image::GrayImage {
    let out = ImageprocOps.morphology(&gray_view(img), &MorphologyParams::dilate(size));
    to_image(&out)
}

/// Canny edge map of `img` with the given thresholds.
pub fn edge_map(img: &::image::GrayImage, low: f32, high: f32) -> ::image::GrayImage {
    let params = EdgeParams {
        low_threshold: low,
        high_threshold: high,
    };
    to_image(&ImageprocOps.edge_map(&gray_view(img), &params))
}

/// Copy of the frame `img` with the four selected boundary lines drawn in
/// gray level `value`.
pub fn draw_boundary(
    img: &::image::GrayImage,
    result: &GridDetectionResult,
    value: u8,
) -> ::image::GrayImage {
    let mut canvas = img.clone();
    let (dx, dy) = (result.bounds.left as f64, result.bounds.top as f64);
    for role in [
        BoundaryRole::Top,
        BoundaryRole::Bottom,
        BoundaryRole::Left,
        BoundaryRole::Right,
    ] {
        let line = result.boundary.line(role).translated(dx, dy);
        draw_line_segment_mut(
            &mut canvas,
            (line.x1 as f32, line.y1 as f32),
            (line.x2 as f32, line.y2 as f32),
            ::image::Luma([value]),
        );
    }
    canvas
}
