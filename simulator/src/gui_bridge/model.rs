use gesturecore::landmarks::DetectionResult;
use gesturecore::prelude::VideoFrame;
use gesturecore::render::FrameReport;
use serde::{Deserialize, Serialize};

/// Latest frame as served to the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OverlayModel {
    pub frame: Option<VideoFrame>,
    pub detections: DetectionResult,
    pub report: FrameReport,
    pub status: String,
}
