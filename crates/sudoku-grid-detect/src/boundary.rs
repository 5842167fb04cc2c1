//! Selection of the four extremal grid boundary lines.

use std::fmt;

use serde::{Deserialize, Serialize};
use sudoku_grid_core::LineSegment;

use crate::lines::{Axis, LineGroup};
use crate::GridDetectError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRole {
    Top,
    Bottom,
    Left,
    Right,
}

impl BoundaryRole {
    /// Group a line for this role must come from.
    pub fn axis(self) -> Axis {
        match self {
            BoundaryRole::Top | BoundaryRole::Bottom => Axis::Horizontal,
            BoundaryRole::Left | BoundaryRole::Right => Axis::Vertical,
        }
    }
}

impl fmt::Display for BoundaryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryRole::Top => "topLine",
            BoundaryRole::Bottom => "bottomLine",
            BoundaryRole::Left => "leftLine",
            BoundaryRole::Right => "rightLine",
        };
        f.write_str(name)
    }
}

/// The extremal line on each side of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryQuad {
    pub top: LineSegment,
    pub bottom: LineSegment,
    pub left: LineSegment,
    pub right: LineSegment,
}

impl BoundaryQuad {
    pub fn line(&self, role: BoundaryRole) -> &LineSegment {
        match role {
            BoundaryRole::Top => &self.top,
            BoundaryRole::Bottom => &self.bottom,
            BoundaryRole::Left => &self.left,
            BoundaryRole::Right => &self.right,
        }
    }
}

/// Single pass over `lines` keeping the first line whose key strictly beats
/// the running best. Ties keep the earlier line.
fn running_extremum(
    lines: &[LineSegment],
    key: impl Fn(&LineSegment) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<LineSegment> {
    lines
        .iter()
        .fold(None::<(LineSegment, f64)>, |best, line| {
            let k = key(line);
            match best {
                Some((_, bound)) if !beats(k, bound) => best,
                _ => Some((*line, k)),
            }
        })
        .map(|(line, _)| line)
}

/// Pick `top`/`bottom` from the horizontal group and `left`/`right` from the
/// vertical group.
///
/// A line replaces the current top when either endpoint lies above the
/// current bound (`min(y1, y2) < bound`); bottom, left and right follow the
/// same rule on their own side. Fails with
/// [`GridDetectError::InsufficientLines`] naming every unfilled role.
pub fn select_boundary_lines(
    horizontal: &LineGroup,
    vertical: &LineGroup,
) -> Result<BoundaryQuad, GridDetectError> {
    debug_assert_eq!(horizontal.axis, BoundaryRole::Top.axis());
    debug_assert_eq!(vertical.axis, BoundaryRole::Left.axis());

    let top = running_extremum(&horizontal.lines, LineSegment::min_y, |k, b| k < b);
    let bottom = running_extremum(&horizontal.lines, LineSegment::max_y, |k, b| k > b);
    let left = running_extremum(&vertical.lines, LineSegment::min_x, |k, b| k < b);
    let right = running_extremum(&vertical.lines, LineSegment::max_x, |k, b| k > b);

    match (top, bottom, left, right) {
        (Some(top), Some(bottom), Some(left), Some(right)) => {
            log::debug!(
                "boundary lines: top={:?} bottom={:?} left={:?} right={:?}",
                top,
                bottom,
                left,
                right
            );
            Ok(BoundaryQuad {
                top,
                bottom,
                left,
                right,
            })
        }
        (top, bottom, left, right) => {
            let missing: Vec<BoundaryRole> = [
                (BoundaryRole::Top, top.is_none()),
                (BoundaryRole::Bottom, bottom.is_none()),
                (BoundaryRole::Left, left.is_none()),
                (BoundaryRole::Right, right.is_none()),
            ]
            .into_iter()
            .filter_map(|(role, absent)| absent.then_some(role))
            .collect();
            Err(GridDetectError::InsufficientLines { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::classify_lines;

    fn group(axis: Axis, lines: &[LineSegment]) -> LineGroup {
        LineGroup {
            axis,
            lines: lines.to_vec(),
        }
    }

    #[test]
    fn picks_extremes_on_each_side() {
        let h = [
            LineSegment::new(0.0, 40.0, 100.0, 42.0),
            LineSegment::new(0.0, 12.0, 100.0, 9.0),
            LineSegment::new(0.0, 95.0, 100.0, 97.0),
            LineSegment::new(0.0, 60.0, 100.0, 61.0),
        ];
        let v = [
            LineSegment::new(50.0, 0.0, 51.0, 100.0),
            LineSegment::new(93.0, 0.0, 96.0, 100.0),
            LineSegment::new(8.0, 0.0, 4.0, 100.0),
        ];
        let quad =
            select_boundary_lines(&group(Axis::Horizontal, &h), &group(Axis::Vertical, &v))
                .expect("all roles filled");
        assert_eq!(quad.top, h[1]);
        assert_eq!(quad.bottom, h[2]);
        assert_eq!(quad.left, v[2]);
        assert_eq!(quad.right, v[1]);
    }

    #[test]
    fn either_endpoint_can_trigger_update() {
        // second line's right end sits above the first line entirely
        let h = [
            LineSegment::new(0.0, 20.0, 100.0, 20.0),
            LineSegment::new(0.0, 30.0, 100.0, 15.0),
        ];
        let v = [LineSegment::new(0.0, 0.0, 0.0, 100.0)];
        let quad =
            select_boundary_lines(&group(Axis::Horizontal, &h), &group(Axis::Vertical, &v))
                .expect("quad");
        assert_eq!(quad.top, h[1]);
        assert_eq!(quad.bottom, h[1]);
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let h = [
            LineSegment::new(0.0, 10.0, 100.0, 10.0),
            LineSegment::new(5.0, 10.0, 95.0, 10.0),
        ];
        let v = [LineSegment::new(0.0, 0.0, 1.0, 100.0)];
        let quad =
            select_boundary_lines(&group(Axis::Horizontal, &h), &group(Axis::Vertical, &v))
                .expect("quad");
        assert_eq!(quad.top, h[0]);
        assert_eq!(quad.bottom, h[0]);
    }

    #[test]
    fn empty_horizontal_group_names_top_and_bottom() {
        let v = [LineSegment::new(0.0, 0.0, 0.0, 100.0)];
        let err = select_boundary_lines(&LineGroup::new(Axis::Horizontal), &group(Axis::Vertical, &v))
            .unwrap_err();
        match err {
            GridDetectError::InsufficientLines { missing } => {
                assert_eq!(missing, vec![BoundaryRole::Top, BoundaryRole::Bottom]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn selection_is_idempotent() {
        let segs = [
            LineSegment::new(3.0, 11.0, 180.0, 14.0),
            LineSegment::new(1.0, 170.0, 179.0, 166.0),
            LineSegment::new(12.0, 2.0, 9.0, 177.0),
            LineSegment::new(171.0, 5.0, 175.0, 178.0),
            LineSegment::new(2.0, 90.0, 178.0, 88.0),
            LineSegment::new(90.0, 4.0, 91.0, 176.0),
        ];
        let c = classify_lines(&segs);
        let a = select_boundary_lines(&c.horizontal, &c.vertical).expect("first");
        let b = select_boundary_lines(&c.horizontal, &c.vertical).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn role_names_match_pipeline_vocabulary() {
        assert_eq!(BoundaryRole::Top.to_string(), "topLine");
        assert_eq!(BoundaryRole::Right.axis(), Axis::Vertical);
    }
}
