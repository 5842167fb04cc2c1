use serde::{Deserialize, Serialize};

use crate::corners::DEFAULT_PARALLEL_TOLERANCE;
use crate::ops::{EdgeParams, MorphologyParams, SegmentParams};
use crate::rectify::RectifyParams;
use crate::region::RegionParams;

/// Which image the rectifier resamples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarpSource {
    /// The edge map of the cropped region.
    #[default]
    EdgeMap,
    /// The grayscale input, cropped to the region.
    Grayscale,
}

/// Configuration for [`SudokuGridDetector`](crate::SudokuGridDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDetectorParams {
    /// Edge operator thresholds, used for both the full frame and the crop.
    pub edges: EdgeParams,
    pub segments: SegmentParams,
    pub region: RegionParams,
    /// Run the coarse band scan; when off the whole frame is the region.
    pub locate_region: bool,
    pub rectify: RectifyParams,
    pub warp_source: WarpSource,
    /// Relative tolerance for declaring two boundary lines parallel.
    pub parallel_tolerance: f64,
    /// Morphology passes applied in order to the rectified image.
    pub cleanup: Vec<MorphologyParams>,
}

impl Default for GridDetectorParams {
    fn default() -> Self {
        Self {
            edges: EdgeParams::default(),
            segments: SegmentParams::default(),
            region: RegionParams::default(),
            locate_region: true,
            rectify: RectifyParams::default(),
            warp_source: WarpSource::default(),
            parallel_tolerance: DEFAULT_PARALLEL_TOLERANCE,
            cleanup: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MorphOp;
    use crate::rectify::CornerMapping;

    #[test]
    fn partial_json_keeps_defaults() {
        let raw = r#"{
            "region": { "squareness_tolerance": 30 },
            "rectify": { "output_size": [450, 450], "corner_mapping": "identity" },
            "cleanup": [{ "shape": "cross", "size": 3, "op": "dilate" }]
        }"#;
        let p: GridDetectorParams = serde_json::from_str(raw).expect("valid config");
        assert_eq!(p.region.squareness_tolerance, 30);
        assert_eq!(p.region.margin, 5);
        assert_eq!(p.region.background, 255);
        assert_eq!(p.rectify.output_size, Some([450, 450]));
        assert_eq!(p.rectify.corner_mapping, CornerMapping::Identity);
        assert_eq!(p.cleanup[0].op, MorphOp::Dilate);
        assert_eq!(p.edges, EdgeParams::default());
        assert_eq!(p.segments.vote_threshold, 150);
        assert!(p.locate_region);
        assert_eq!(p.warp_source, WarpSource::EdgeMap);
    }
}
