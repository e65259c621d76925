use gesturecore::prelude::{FrameSize, VideoFrame};
use gesturecore::render::{
    approximate_text_width, DrawingSurface, FontSpec, Point as OverlayPoint, Rect, Rgba,
};
use iced::{
    font::Weight,
    widget::canvas::{self, Frame, Path, Stroke},
    Color, Font, Pixels, Point, Size,
};

const BACKGROUND: Color = Color::from_rgb(0.02, 0.02, 0.04);
const VIDEO_PLACEHOLDER: Color = Color::from_rgb(0.08, 0.09, 0.11);

/// Maps frame pixels onto the canvas as a selfie view: scaled to fit and
/// flipped horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    width: f32,
    scale_x: f32,
    scale_y: f32,
}

impl Mirror {
    pub fn fit(source: FrameSize, target: Size) -> Self {
        let width = source.width.max(1) as f32;
        let height = source.height.max(1) as f32;
        Self {
            width,
            scale_x: target.width / width,
            scale_y: target.height / height,
        }
    }

    pub fn point(&self, point: OverlayPoint) -> Point {
        Point::new((self.width - point.x) * self.scale_x, point.y * self.scale_y)
    }

    /// Left edge on the canvas of the span `[x, x + span]` after flipping.
    pub fn left_edge(&self, x: f32, span: f32) -> f32 {
        (self.width - (x + span)) * self.scale_x
    }

    pub fn length(&self, length: f32) -> f32 {
        length * self.scale_x.min(self.scale_y)
    }

    pub fn size(&self, width: f32, height: f32) -> Size {
        Size::new(width * self.scale_x, height * self.scale_y)
    }
}

pub fn to_color(color: Rgba) -> Color {
    let [r, g, b, a] = color.to_unit();
    Color::from_rgba(r, g, b, a)
}

/// Overlay surface backed by an iced canvas frame.
pub struct CanvasSurface<'a> {
    frame: &'a mut Frame,
    size: FrameSize,
    mirror: Mirror,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(frame: &'a mut Frame, size: FrameSize) -> Self {
        let mirror = Mirror::fit(size, frame.size());
        Self {
            frame,
            size,
            mirror,
        }
    }
}

impl DrawingSurface for CanvasSurface<'_> {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn resize(&mut self, size: FrameSize) {
        self.size = size;
        self.mirror = Mirror::fit(size, self.frame.size());
    }

    fn clear(&mut self) {
        self.frame
            .fill_rectangle(Point::ORIGIN, self.frame.size(), BACKGROUND);
    }

    fn draw_frame(&mut self, _frame: &VideoFrame) {
        let size = self
            .mirror
            .size(self.size.width as f32, self.size.height as f32);
        self.frame
            .fill_rectangle(Point::ORIGIN, size, VIDEO_PLACEHOLDER);
    }

    fn stroke_line(&mut self, from: OverlayPoint, to: OverlayPoint, width: f32, color: Rgba) {
        let path = Path::line(self.mirror.point(from), self.mirror.point(to));
        self.frame.stroke(
            &path,
            Stroke::default()
                .with_width(self.mirror.length(width))
                .with_color(to_color(color)),
        );
    }

    fn fill_circle(&mut self, center: OverlayPoint, radius: f32, color: Rgba) {
        let path = Path::circle(self.mirror.point(center), self.mirror.length(radius));
        self.frame.fill(&path, to_color(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let top_left = Point::new(
            self.mirror.left_edge(rect.x, rect.width),
            self.mirror.point(OverlayPoint::new(rect.x, rect.y)).y,
        );
        self.frame.fill_rectangle(
            top_left,
            self.mirror.size(rect.width, rect.height),
            to_color(color),
        );
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        approximate_text_width(text, font)
    }

    // The canvas itself is not flipped, so the text is laid out unflipped at
    // the mirrored position of its span.
    fn fill_text_mirrored(
        &mut self,
        text: &str,
        origin: OverlayPoint,
        width: f32,
        font: &FontSpec,
        color: Rgba,
    ) {
        let weight = if font.bold {
            Weight::Bold
        } else {
            Weight::Normal
        };
        let position = Point::new(
            self.mirror.left_edge(origin.x, width),
            self.mirror
                .point(OverlayPoint::new(origin.x, origin.y - font.size_px))
                .y,
        );
        self.frame.fill_text(canvas::Text {
            content: text.to_string(),
            position,
            color: to_color(color),
            size: Pixels(self.mirror.length(font.size_px)),
            font: Font {
                weight,
                ..Font::DEFAULT
            },
            ..canvas::Text::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_flips_and_scales() {
        let mirror = Mirror::fit(FrameSize::new(640, 480), Size::new(320.0, 240.0));
        assert_eq!(
            mirror.point(OverlayPoint::new(100.0, 200.0)),
            Point::new(270.0, 100.0)
        );
        assert_eq!(mirror.point(OverlayPoint::new(640.0, 0.0)), Point::new(0.0, 0.0));
        assert_eq!(mirror.length(10.0), 5.0);
    }

    #[test]
    fn mirrored_span_starts_at_flipped_right_edge() {
        let mirror = Mirror::fit(FrameSize::new(640, 480), Size::new(640.0, 480.0));
        assert_eq!(mirror.left_edge(200.0, 100.0), 340.0);
        assert_eq!(mirror.left_edge(0.0, 640.0), 0.0);
    }

    #[test]
    fn empty_source_does_not_divide_by_zero() {
        let mirror = Mirror::fit(FrameSize::new(0, 0), Size::new(100.0, 100.0));
        assert!(mirror.point(OverlayPoint::new(0.5, 0.5)).x.is_finite());
    }

    #[test]
    fn colours_keep_alpha() {
        let color = to_color(Rgba::rgba(255, 0, 0, 0.5));
        assert_eq!(color, Color::from_rgba(1.0, 0.0, 0.0, 0.5));
    }
}
