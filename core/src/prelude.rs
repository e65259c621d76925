use serde::{Deserialize, Serialize};

/// Pixel dimensions of a capture frame and of the surface drawn over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Handle to the frame currently exposed by the capture source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoFrame {
    pub size: FrameSize,
    /// Media timestamp in seconds; repeats while the source is stalled.
    pub current_time: f64,
}

impl VideoFrame {
    pub fn new(size: FrameSize, current_time: f64) -> Self {
        Self { size, current_time }
    }
}

/// Common error type for the overlay pipeline.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    #[error("expected {expected} landmarks per hand, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },
    #[error("{landmarks} landmark sets but {handedness} handedness labels")]
    MismatchedHandedness { landmarks: usize, handedness: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },
    #[error("hand detector is not initialized")]
    DetectorUnavailable,
    #[error("detector initialization failed: {0}")]
    DetectorInit(String),
    #[error("detection failed: {0}")]
    Detection(String),
    #[error("camera capture is not supported")]
    CaptureUnsupported,
    #[error("capture failure: {0}")]
    Capture(String),
    #[error("gesture sink failure: {0}")]
    Sink(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
