use crate::prelude::{OverlayResult, VideoFrame};

/// Live video source the overlay is drawn over.
pub trait CaptureSource {
    /// Whether the platform can capture at all.
    fn is_supported(&self) -> bool {
        true
    }

    fn open(&mut self) -> OverlayResult<()>;

    /// The frame currently on display, or `None` until the stream has data.
    fn current_frame(&mut self) -> Option<VideoFrame>;

    fn close(&mut self) {}
}
