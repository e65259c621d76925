//! Gesture metrics and skeleton overlays for live hand-landmark feeds.
//!
//! Landmarks arrive from an external detector; this crate derives finger
//! counts and pinch brightness per hand and draws mirrored overlays onto any
//! [`render::DrawingSurface`]. The [`session`] module sequences capture,
//! detection and rendering once per display refresh.

pub mod gesture;
pub mod landmarks;
pub mod math;
pub mod prelude;
pub mod render;
pub mod session;
pub mod sync;
pub mod telemetry;

pub use prelude::{FrameSize, OverlayError, OverlayResult, VideoFrame};

#[cfg(test)]
mod testing;
