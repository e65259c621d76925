pub mod color;
pub mod overlay;
pub mod recording;
pub mod style;
pub mod surface;

pub use color::Rgba;
pub use overlay::{FrameReport, HandOverlay, OverlayRenderer};
pub use recording::{DrawCommand, RecordingSurface};
pub use style::{FontSpec, OverlayStyle};
pub use surface::{approximate_text_width, DrawingSurface, Point, Rect};
