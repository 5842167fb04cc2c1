use crate::boundary::BoundaryRole;
use crate::corners::CornerRole;
use crate::region::{RegionBox, Side};

fn role_list(roles: &[BoundaryRole]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that abort grid detection for the current image.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridDetectError {
    #[error("no candidate line for {}", role_list(.missing))]
    InsufficientLines { missing: Vec<BoundaryRole> },
    #[error("boundary lines meeting at {corner} are parallel")]
    ParallelLines { corner: CornerRole },
    #[error("perspective correspondence is degenerate")]
    DegenerateCorrespondence,
    #[error("coarse scan found no {side} boundary")]
    BoundaryNotFound { side: Side },
    #[error("region {region:?} does not overlap the image")]
    EmptyRegion { region: RegionBox },
    #[error("invalid rectified output size {width}x{height}")]
    InvalidOutputSize { width: usize, height: usize },
}
