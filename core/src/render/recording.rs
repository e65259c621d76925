use crate::prelude::{FrameSize, VideoFrame};
use crate::render::color::Rgba;
use crate::render::style::FontSpec;
use crate::render::surface::{approximate_text_width, DrawingSurface, Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Frame {
        current_time: f64,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Rect {
        rect: Rect,
        color: Rgba,
    },
    MirroredText {
        text: String,
        origin: Point,
        width: f32,
        color: Rgba,
    },
}

/// Surface that keeps a log of draw calls instead of rasterizing them.
///
/// Backs the headless simulator and the renderer tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: FrameSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::MirroredText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn resize(&mut self, size: FrameSize) {
        self.size = size;
    }

    // A cleared canvas forgets everything drawn before it.
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_frame(&mut self, frame: &VideoFrame) {
        self.commands.push(DrawCommand::Frame {
            current_time: frame.current_time,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        approximate_text_width(text, font)
    }

    fn fill_text_mirrored(
        &mut self,
        text: &str,
        origin: Point,
        width: f32,
        _font: &FontSpec,
        color: Rgba,
    ) {
        self.commands.push(DrawCommand::MirroredText {
            text: text.to_string(),
            origin,
            width,
            color,
        });
    }
}
