use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Image-plane coordinate.
pub type Point2D = Point2<f64>;

/// A detected straight segment, endpoints in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_points(a: Point2D, b: Point2D) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        Vector2::new(self.dx(), self.dy())
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x1.min(self.x2)
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x1.max(self.x2)
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y1.min(self.y2)
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y1.max(self.y2)
    }

    /// Shift both endpoints by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }
}

impl From<[f64; 4]> for LineSegment {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Twice the signed area of triangle `abc`.
#[inline]
pub fn cross3(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True when any three of the four points are collinear (within `tol`
/// relative to the quad's squared extent), i.e. no projective map exists.
pub fn quad_is_degenerate(quad: &[Point2D; 4], tol: f64) -> bool {
    let extent = quad
        .iter()
        .flat_map(|p| quad.iter().map(move |q| (p - q).norm_squared()))
        .fold(0.0_f64, f64::max);
    if extent <= f64::EPSILON {
        return true;
    }
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES
        .iter()
        .any(|&[i, j, k]| cross3(&quad[i], &quad[j], &quad[k]).abs() <= tol * extent)
}
