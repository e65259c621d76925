use crate::gesture::{ClassifierConfig, DisplaySide, GestureClassifier, GestureMetrics};
use crate::landmarks::{DetectedHand, DetectionResult, Handedness, Landmark, HAND_CONNECTIONS};
use crate::math::GeometryHelper;
use crate::prelude::{FrameSize, OverlayError, OverlayResult, VideoFrame};
use crate::render::style::OverlayStyle;
use crate::render::surface::{DrawingSurface, Point, Rect};
use crate::telemetry::{LogManager, MetricsRecorder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What was drawn for one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandOverlay {
    pub index: usize,
    pub handedness: Handedness,
    pub display_side: DisplaySide,
    pub metrics: GestureMetrics,
    pub label: String,
}

/// Summary of one rendered frame; also the payload of the gesture sync path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameReport {
    pub current_time: f64,
    pub hands: Vec<HandOverlay>,
    pub failed_hands: usize,
}

/// Where the label backdrop and text go for a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub backdrop: Rect,
    pub text_origin: Point,
    pub text_width: f32,
}

/// Draws skeletons, joints and mirrored metric labels for each detected hand.
pub struct OverlayRenderer {
    style: OverlayStyle,
    classifier: GestureClassifier,
    logger: LogManager,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle, classifier: ClassifierConfig) -> Self {
        Self {
            style,
            classifier: GestureClassifier::new(classifier),
            logger: LogManager::new("gesturecore::overlay"),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Clears the surface, paints the frame and overlays every hand.
    ///
    /// The surface must already match the frame size. A hand that fails to
    /// draw is logged and skipped; the others are still drawn.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &VideoFrame,
        detections: Option<&DetectionResult>,
    ) -> FrameReport {
        surface.clear();
        surface.draw_frame(frame);

        let size = surface.size();
        let mut report = FrameReport {
            current_time: frame.current_time,
            ..Default::default()
        };

        for (index, detected) in detections.iter().flat_map(|d| d.hands.iter()).enumerate() {
            match self.draw_hand(surface, size, index, detected) {
                Ok(overlay) => report.hands.push(overlay),
                Err(err) => {
                    report.failed_hands += 1;
                    self.logger
                        .failure(&format!("drawing hand {} failed", index), &err);
                }
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_frame(report.hands.len(), report.failed_hands);
        }
        report
    }

    fn draw_hand<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        size: FrameSize,
        index: usize,
        detected: &DetectedHand,
    ) -> OverlayResult<HandOverlay> {
        let hand = &detected.hand;
        if let Some(bad) = hand.first_non_finite() {
            return Err(OverlayError::NonFiniteLandmark { index: bad });
        }

        let side = DisplaySide::of(hand);
        let color = self.style.color(side);
        let points: Vec<Point> = hand
            .landmarks()
            .iter()
            .map(|landmark| project(landmark, size))
            .collect();

        for [from, to] in HAND_CONNECTIONS {
            surface.stroke_line(points[from], points[to], self.style.line_width, color);
        }
        for point in &points {
            surface.fill_circle(*point, self.style.joint_radius, color);
        }

        let metrics = self.classifier.classify(hand, side);
        let label = label_text(side, &metrics);
        self.logger.trace_frame(&format!(
            "hand {}: detector {} ({}) display {} fingers {} brightness {}",
            index,
            detected.handedness,
            detected
                .score
                .map_or_else(|| "no score".to_string(), |score| format!("{:.2}", score)),
            side.as_str(),
            metrics.finger_count,
            metrics.brightness_level
        ));

        let text_width = surface.measure_text(&label, &self.style.font);
        let layout = self.label_layout(points[0], text_width);
        surface.fill_rect(layout.backdrop, self.style.backdrop(side));
        surface.fill_text_mirrored(
            &label,
            layout.text_origin,
            layout.text_width,
            &self.style.font,
            color,
        );

        Ok(HandOverlay {
            index,
            handedness: detected.handedness,
            display_side: side,
            metrics,
            label,
        })
    }

    /// Places the label to the right of the wrist, baseline on the wrist.
    pub fn label_layout(&self, wrist: Point, text_width: f32) -> LabelLayout {
        let text_x = wrist.x + self.style.label_offset_x;
        let pad = self.style.label_padding_x;
        LabelLayout {
            backdrop: Rect {
                x: text_x - pad,
                y: wrist.y - self.style.label_rise,
                width: text_width + 2.0 * pad,
                height: self.style.label_box_height,
            },
            text_origin: Point::new(text_x, wrist.y),
            text_width,
        }
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(OverlayStyle::default(), ClassifierConfig::default())
    }
}

/// Normalized landmark to surface pixels.
pub fn project(landmark: &Landmark, size: FrameSize) -> Point {
    Point::new(
        GeometryHelper::map_range(landmark.x, 0.0, 1.0, 0.0, size.width as f32),
        GeometryHelper::map_range(landmark.y, 0.0, 1.0, 0.0, size.height as f32),
    )
}

/// The right-side hand reports its finger count, the left-side hand its
/// brightness level.
pub fn label_text(side: DisplaySide, metrics: &GestureMetrics) -> String {
    match side {
        DisplaySide::Right => format!("Right hand: {} fingers", metrics.finger_count),
        DisplaySide::Left => format!("Left hand: brightness {}", metrics.brightness_level),
    }
}
