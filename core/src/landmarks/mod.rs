pub mod detection;
pub mod landmark;
pub mod topology;

pub use detection::{DetectedHand, DetectionResult, Hand};
pub use landmark::{Handedness, Landmark};
pub use topology::{HAND_CONNECTIONS, LANDMARK_COUNT};
