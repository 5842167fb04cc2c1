//! Grid corners as intersections of adjacent boundary lines.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use sudoku_grid_core::{LineSegment, Point2D};

use crate::boundary::{BoundaryQuad, BoundaryRole};
use crate::GridDetectError;

/// Default relative tolerance: lines whose direction sine is below this are
/// treated as parallel.
pub const DEFAULT_PARALLEL_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerRole {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerRole {
    pub const ALL: [CornerRole; 4] = [
        CornerRole::TopLeft,
        CornerRole::TopRight,
        CornerRole::BottomLeft,
        CornerRole::BottomRight,
    ];

    /// The (horizontal, vertical) boundary pair meeting at this corner.
    pub fn boundary_pair(self) -> (BoundaryRole, BoundaryRole) {
        match self {
            CornerRole::TopLeft => (BoundaryRole::Top, BoundaryRole::Left),
            CornerRole::TopRight => (BoundaryRole::Top, BoundaryRole::Right),
            CornerRole::BottomLeft => (BoundaryRole::Bottom, BoundaryRole::Left),
            CornerRole::BottomRight => (BoundaryRole::Bottom, BoundaryRole::Right),
        }
    }
}

impl fmt::Display for CornerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CornerRole::TopLeft => "topLeft",
            CornerRole::TopRight => "topRight",
            CornerRole::BottomLeft => "bottomLeft",
            CornerRole::BottomRight => "bottomRight",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_left: Point2D,
    pub bottom_right: Point2D,
}

impl CornerSet {
    pub fn corner(&self, role: CornerRole) -> Point2D {
        match role {
            CornerRole::TopLeft => self.top_left,
            CornerRole::TopRight => self.top_right,
            CornerRole::BottomLeft => self.bottom_left,
            CornerRole::BottomRight => self.bottom_right,
        }
    }

    /// Corners in `[topLeft, topRight, bottomLeft, bottomRight]` order.
    pub fn to_array(&self) -> [Point2D; 4] {
        CornerRole::ALL.map(|role| self.corner(role))
    }

    /// Shift every corner by `(dx, dy)`, e.g. from crop to full-image coordinates.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let shift = |p: Point2D| Point2::new(p.x + dx, p.y + dy);
        Self {
            top_left: shift(self.top_left),
            top_right: shift(self.top_right),
            bottom_left: shift(self.bottom_left),
            bottom_right: shift(self.bottom_right),
        }
    }
}

/// Intersection of the infinite lines through `a` and `b`.
///
/// Returns `None` when the lines are parallel (or a segment has zero
/// length): `|d| <= tol * |a| * |b|`.
pub fn intersect_lines(a: &LineSegment, b: &LineSegment, tol: f64) -> Option<Point2D> {
    let (x1, y1, x2, y2) = (a.x1, a.y1, a.x2, a.y2);
    let (x3, y3, x4, y4) = (b.x1, b.y1, b.x2, b.y2);

    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if d.abs() <= tol * a.length() * b.length() || !d.is_finite() {
        return None;
    }

    let da = x1 * y2 - y1 * x2;
    let db = x3 * y4 - y3 * x4;
    let x = (da * (x3 - x4) - (x1 - x2) * db) / d;
    let y = (da * (y3 - y4) - (y1 - y2) * db) / d;
    Some(Point2::new(x, y))
}

/// Intersect the boundary lines pairwise into the four grid corners.
pub fn solve_corners(quad: &BoundaryQuad, tol: f64) -> Result<CornerSet, GridDetectError> {
    let solve = |role: CornerRole| {
        let (h, v) = role.boundary_pair();
        intersect_lines(quad.line(h), quad.line(v), tol)
            .ok_or(GridDetectError::ParallelLines { corner: role })
    };

    let corners = CornerSet {
        top_left: solve(CornerRole::TopLeft)?,
        bottom_left: solve(CornerRole::BottomLeft)?,
        top_right: solve(CornerRole::TopRight)?,
        bottom_right: solve(CornerRole::BottomRight)?,
    };
    log::debug!("grid corners: {:?}", corners.to_array());
    Ok(corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn axes_meet_at_origin() {
        let x_axis = LineSegment::new(-5.0, 0.0, 5.0, 0.0);
        let y_axis = LineSegment::new(0.0, -5.0, 0.0, 5.0);
        let p = intersect_lines(&x_axis, &y_axis, DEFAULT_PARALLEL_TOLERANCE).expect("crossing");
        assert_abs_diff_eq!(p.x, 0.0);
        assert_abs_diff_eq!(p.y, 0.0);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let a = LineSegment::new(0.0, 0.0, 10.0, 0.0);
        let b = LineSegment::new(0.0, 5.0, 10.0, 5.0);
        assert!(intersect_lines(&a, &b, DEFAULT_PARALLEL_TOLERANCE).is_none());
    }

    #[test]
    fn segments_are_extended_to_infinite_lines() {
        let a = LineSegment::new(0.0, 10.0, 1.0, 11.0);
        let b = LineSegment::new(50.0, 0.0, 50.0, 1.0);
        let p = intersect_lines(&a, &b, DEFAULT_PARALLEL_TOLERANCE).expect("crossing");
        assert_abs_diff_eq!(p.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn square_boundary_gives_square_corners() {
        let quad = BoundaryQuad {
            top: LineSegment::new(0.0, 0.0, 100.0, 0.0),
            bottom: LineSegment::new(0.0, 100.0, 100.0, 100.0),
            left: LineSegment::new(0.0, 0.0, 0.0, 100.0),
            right: LineSegment::new(100.0, 0.0, 100.0, 100.0),
        };
        let c = solve_corners(&quad, DEFAULT_PARALLEL_TOLERANCE).expect("corners");
        let expected = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
        for (got, (ex, ey)) in c.to_array().iter().zip(expected) {
            assert_abs_diff_eq!(got.x, ex, epsilon = 1e-9);
            assert_abs_diff_eq!(got.y, ey, epsilon = 1e-9);
        }
    }

    #[test]
    fn parallel_boundaries_report_the_corner() {
        // left line is horizontal, so top and left never meet
        let quad = BoundaryQuad {
            top: LineSegment::new(0.0, 0.0, 100.0, 0.0),
            bottom: LineSegment::new(0.0, 100.0, 100.0, 100.0),
            left: LineSegment::new(0.0, 50.0, 100.0, 50.0),
            right: LineSegment::new(100.0, 0.0, 100.0, 100.0),
        };
        let err = solve_corners(&quad, DEFAULT_PARALLEL_TOLERANCE).unwrap_err();
        assert!(matches!(
            err,
            GridDetectError::ParallelLines {
                corner: CornerRole::TopLeft
            }
        ));
    }

    #[test]
    fn translation_shifts_every_corner() {
        let c = CornerSet {
            top_left: Point2::new(1.0, 2.0),
            top_right: Point2::new(9.0, 2.0),
            bottom_left: Point2::new(1.0, 8.0),
            bottom_right: Point2::new(9.0, 8.0),
        };
        let t = c.translated(10.0, 20.0);
        assert_eq!(t.top_left, Point2::new(11.0, 22.0));
        assert_eq!(t.bottom_right, Point2::new(19.0, 28.0));
    }
}
