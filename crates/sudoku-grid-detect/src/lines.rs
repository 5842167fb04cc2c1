//! Orientation split of detected segments.

use serde::{Deserialize, Serialize};
use sudoku_grid_core::LineSegment;

/// Absolute tolerance on `|dx| - |dy|` below which orientation is ambiguous.
pub const ORIENTATION_TOL: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Orientation of a single segment; `None` when `|dx| == |dy|`.
pub fn segment_axis(seg: &LineSegment) -> Option<Axis> {
    let balance = seg.dx().abs() - seg.dy().abs();
    if balance > ORIENTATION_TOL {
        Some(Axis::Horizontal)
    } else if balance < -ORIENTATION_TOL {
        Some(Axis::Vertical)
    } else {
        None
    }
}

/// Segments sharing one orientation, in detection order.
#[derive(Clone, Debug, PartialEq)]
pub struct LineGroup {
    pub axis: Axis,
    pub lines: Vec<LineSegment>,
}

impl LineGroup {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            lines: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedLines {
    pub horizontal: LineGroup,
    pub vertical: LineGroup,
    /// Segments with ambiguous (diagonal) orientation.
    pub discarded: usize,
}

impl ClassifiedLines {
    pub fn total(&self) -> usize {
        self.horizontal.len() + self.vertical.len() + self.discarded
    }
}

/// Partition `segments` into horizontal and vertical groups.
///
/// An empty input yields two empty groups; rejecting insufficient lines is
/// left to boundary selection.
pub fn classify_lines(segments: &[LineSegment]) -> ClassifiedLines {
    let mut horizontal = LineGroup::new(Axis::Horizontal);
    let mut vertical = LineGroup::new(Axis::Vertical);
    let mut discarded = 0usize;

    for seg in segments {
        match segment_axis(seg) {
            Some(Axis::Horizontal) => horizontal.lines.push(*seg),
            Some(Axis::Vertical) => vertical.lines.push(*seg),
            None => discarded += 1,
        }
    }

    log::debug!(
        "segments in: {}, horizontal: {}, vertical: {}, discarded: {}",
        segments.len(),
        horizontal.len(),
        vertical.len(),
        discarded
    );

    ClassifiedLines {
        horizontal,
        vertical,
        discarded,
    }
}
