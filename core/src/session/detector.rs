use crate::landmarks::DetectionResult;
use crate::prelude::{OverlayResult, VideoFrame};
use serde::{Deserialize, Serialize};

/// Acceleration backend requested when loading the landmark model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Delegate {
    Gpu,
    Cpu,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunningMode {
    Image,
    Video,
}

/// Parameters handed to whatever loads the external hand landmarker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorOptions {
    pub model_asset_path: String,
    pub delegate: Delegate,
    pub running_mode: RunningMode,
    pub num_hands: usize,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            model_asset_path: "models/hand_landmarker.task".into(),
            delegate: Delegate::Gpu,
            running_mode: RunningMode::Video,
            num_hands: 2,
        }
    }
}

/// External landmark detector, invoked synchronously once per new frame.
pub trait HandDetector {
    fn detect_for_frame(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> OverlayResult<DetectionResult>;
}

impl<F> HandDetector for F
where
    F: FnMut(&VideoFrame, f64) -> OverlayResult<DetectionResult>,
{
    fn detect_for_frame(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> OverlayResult<DetectionResult> {
        self(frame, timestamp_ms)
    }
}
