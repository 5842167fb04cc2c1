//! [`ImageOps`] backend on top of `imageproc`.

use imageproc::edges::canny;
use imageproc::hough::{detect_lines, LineDetectionOptions, PolarLine};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};
use sudoku_grid_core::{GrayImage, GrayImageView, LineSegment, Point2, Point2D};
use sudoku_grid_detect::{
    EdgeParams, ImageOps, KernelShape, MorphOp, MorphologyParams, SegmentParams,
};

/// Canny edges, Hough lines and binary morphology from `imageproc`.
///
/// The Hough accumulator in `imageproc` is fixed at 1 px / 1°; other
/// resolutions in [`SegmentParams`] are ignored.
///
/// `imageproc` votes with `r` computed in `f32` and truncated, so at exactly
/// 90° the votes of a horizontal line straddle two `r` bins. Lines closer to
/// horizontal than to vertical are therefore taken from a pass over the
/// transposed edge map, where they vote at 0°.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageprocOps;

pub(crate) fn to_image_gray(view: &GrayImageView<'_>) -> image::GrayImage {
    image::GrayImage::from_fn(view.width as u32, view.height as u32, |x, y| {
        image::Luma([view.get(x as usize, y as usize).unwrap_or(0)])
    })
}

pub(crate) fn from_image_gray(img: image::GrayImage) -> GrayImage {
    let (width, height) = (img.width() as usize, img.height() as usize);
    GrayImage {
        width,
        height,
        data: img.into_raw(),
    }
}

/// Clip the polar line `x cos θ + y sin θ = r` to the image rectangle.
pub(crate) fn polar_to_segment(line: &PolarLine, width: usize, height: usize) -> Option<LineSegment> {
    const EPS: f64 = 1e-9;
    if width == 0 || height == 0 {
        return None;
    }
    let (s, c) = (line.angle_in_degrees as f64).to_radians().sin_cos();
    let r = line.r as f64;
    let (xmax, ymax) = ((width - 1) as f64, (height - 1) as f64);

    let mut hits: Vec<Point2D> = Vec::with_capacity(4);
    if s.abs() > EPS {
        for x in [0.0, xmax] {
            let y = (r - x * c) / s;
            if (-EPS..=ymax + EPS).contains(&y) {
                hits.push(Point2::new(x, y.clamp(0.0, ymax)));
            }
        }
    }
    if c.abs() > EPS {
        for y in [0.0, ymax] {
            let x = (r - y * s) / c;
            if (-EPS..=xmax + EPS).contains(&x) {
                hits.push(Point2::new(x.clamp(0.0, xmax), y));
            }
        }
    }

    let mut best: Option<(Point2D, Point2D, f64)> = None;
    for (i, a) in hits.iter().enumerate() {
        for b in &hits[i + 1..] {
            let d = (a - b).norm();
            if best.map_or(true, |(_, _, bd)| d > bd) {
                best = Some((*a, *b, d));
            }
        }
    }
    best.filter(|&(_, _, d)| d > 0.0)
        .map(|(a, b, _)| LineSegment::from_points(a, b))
}

fn transposed(img: &image::GrayImage) -> image::GrayImage {
    image::GrayImage::from_fn(img.height(), img.width(), |x, y| *img.get_pixel(y, x))
}

/// `size x size` kernel anchored at its center: a plus sign one pixel wide
/// for [`KernelShape::Cross`], the full square otherwise.
fn structuring_element(shape: KernelShape, size: u8) -> Mask {
    let c = u32::from(size / 2);
    let side = u32::from(size);
    let kernel = image::GrayImage::from_fn(side, side, |x, y| {
        let on = match shape {
            KernelShape::Cross => x == c || y == c,
            KernelShape::Square => true,
        };
        image::Luma([if on { 255 } else { 0 }])
    });
    Mask::from_image(&kernel, size / 2, size / 2)
}

impl ImageOps for ImageprocOps {
    fn edge_map(&self, image: &GrayImageView<'_>, params: &EdgeParams) -> GrayImage {
        let edges = canny(
            &to_image_gray(image),
            params.low_threshold,
            params.high_threshold,
        );
        from_image_gray(edges)
    }

    fn detect_segments(
        &self,
        edges: &GrayImageView<'_>,
        params: &SegmentParams,
    ) -> Vec<LineSegment> {
        if (params.angle_resolution - std::f64::consts::PI / 180.0).abs() > 1e-9
            || (params.distance_resolution - 1.0).abs() > 1e-9
        {
            log::debug!(
                "imageproc Hough runs at 1px/1deg; ignoring rho={} theta={}",
                params.distance_resolution,
                params.angle_resolution
            );
        }
        let options = LineDetectionOptions {
            vote_threshold: params.vote_threshold,
            suppression_radius: params.suppression_radius,
        };
        let img = to_image_gray(edges);
        let (w, h) = (edges.width, edges.height);

        let steep = detect_lines(&img, options.clone())
            .into_iter()
            .filter(|l| l.angle_in_degrees <= 45 || l.angle_in_degrees >= 135)
            .filter_map(|l| polar_to_segment(&l, w, h));
        let shallow = detect_lines(&transposed(&img), options)
            .into_iter()
            .filter(|l| l.angle_in_degrees < 45 || l.angle_in_degrees > 135)
            .filter_map(|l| polar_to_segment(&l, h, w))
            .map(|s| LineSegment::new(s.y1, s.x1, s.y2, s.x2));

        let segments: Vec<LineSegment> = steep.chain(shallow).collect();
        log::debug!(
            "hough: {} segments (votes >= {})",
            segments.len(),
            params.vote_threshold
        );
        segments
    }

    fn morphology(&self, image: &GrayImageView<'_>, params: &MorphologyParams) -> GrayImage {
        if params.size == 0 {
            return image.to_image();
        }
        let src = to_image_gray(image);
        let mask = structuring_element(params.shape, params.size);
        let out = match params.op {
            MorphOp::Erode => grayscale_erode(&src, &mask),
            MorphOp::Dilate => grayscale_dilate(&src, &mask),
        };
        from_image_gray(out)
    }
}
