pub mod classifier;
pub mod side;

pub use classifier::{ClassifierConfig, GestureClassifier, GestureMetrics, BRIGHTNESS_LEVELS};
pub use side::DisplaySide;
