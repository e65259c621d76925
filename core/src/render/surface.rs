use crate::prelude::{FrameSize, VideoFrame};
use crate::render::color::Rgba;
use crate::render::style::FontSpec;
use serde::{Deserialize, Serialize};

/// Pixel-space position on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 2D raster target for the overlay.
///
/// Coordinates are in pixels of the unflipped frame. Implementations that
/// present a selfie view flip the whole surface horizontally; text drawn with
/// [`DrawingSurface::fill_text_mirrored`] is pre-flipped so it reads
/// correctly once presented.
pub trait DrawingSurface {
    fn size(&self) -> FrameSize;
    fn resize(&mut self, size: FrameSize);
    fn clear(&mut self);
    /// Paints the current video frame as the background.
    fn draw_frame(&mut self, frame: &VideoFrame);
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;
    /// Draws `text` flipped horizontally inside `[origin.x, origin.x + width]`
    /// with its baseline at `origin.y`.
    fn fill_text_mirrored(
        &mut self,
        text: &str,
        origin: Point,
        width: f32,
        font: &FontSpec,
        color: Rgba,
    );
}

/// Advance-width estimate for surfaces without a text shaper.
pub fn approximate_text_width(text: &str, font: &FontSpec) -> f32 {
    let advance = if font.bold { 0.6 } else { 0.55 };
    text.chars().count() as f32 * font.size_px * advance
}
