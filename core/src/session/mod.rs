pub mod capture;
pub mod control;
pub mod controller;
pub mod detector;

pub use capture::CaptureSource;
pub use control::{toggle_label, RunFlag, ToggleControl};
pub use controller::{OverlaySession, MIN_REFRESH};
pub use detector::{Delegate, DetectorOptions, HandDetector, RunningMode};
