use crate::generator::template::sweep;
use gesturecore::landmarks::topology::{INDEX_TIP, LANDMARK_COUNT, THUMB_TIP, WRIST};
use gesturecore::landmarks::{Hand, Handedness, Landmark};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_1_SQRT_2;

/// Pose a scripted hand holds (or animates through).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandPose {
    OpenPalm,
    Fist,
    /// Extends index through pinky in order, then the thumb.
    Count { fingers: u8 },
    /// Open palm with the thumb tip `spread` away from the index tip.
    Pinch { spread: f32 },
    /// Pinch whose spread oscillates between `min` and `max`.
    PinchSweep { min: f32, max: f32 },
}

/// One synthetic hand in a workflow scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedHand {
    pub pose: HandPose,
    pub wrist_x: f32,
    pub wrist_y: f32,
    pub scale: f32,
    pub handedness: Handedness,
    /// Handedness confidence the detector reports for this hand.
    pub score: f32,
    /// Frames per animation cycle for animated poses.
    pub period: usize,
}

impl Default for ScriptedHand {
    fn default() -> Self {
        Self {
            pose: HandPose::OpenPalm,
            wrist_x: 0.3,
            wrist_y: 0.8,
            scale: 1.0,
            handedness: Handedness::Left,
            score: 0.95,
            period: 60,
        }
    }
}

const THUMB_EXTENDED: [(f32, f32); 4] = [(0.04, -0.04), (0.08, -0.08), (0.11, -0.12), (0.14, -0.16)];
const THUMB_FOLDED: [(f32, f32); 4] = [(0.04, -0.04), (0.07, -0.07), (0.08, -0.10), (0.03, -0.12)];
const FINGER_EXTENDED: [f32; 4] = [-0.15, -0.23, -0.29, -0.34];
const FINGER_FOLDED: [f32; 4] = [-0.15, -0.20, -0.14, -0.12];

fn extended_digits(pose: &HandPose) -> (usize, bool) {
    match pose {
        HandPose::Fist => (0, false),
        HandPose::Count { fingers } => ((*fingers).min(4) as usize, *fingers >= 5),
        HandPose::OpenPalm | HandPose::Pinch { .. } | HandPose::PinchSweep { .. } => (4, true),
    }
}

fn pinch_spread(pose: &HandPose, frame_index: usize, period: usize) -> Option<f32> {
    match pose {
        HandPose::Pinch { spread } => Some(*spread),
        HandPose::PinchSweep { min, max } => Some(min + (max - min) * sweep(frame_index, period)),
        _ => None,
    }
}

/// Builds the 21 landmarks for `spec` at `frame_index`.
///
/// The thumb always points away from the frame centre, so the generated hand
/// reads as extended for the display side its wrist lands on.
pub fn build_hand(spec: &ScriptedHand, frame_index: usize, rng: &mut StdRng, jitter: f32) -> Hand {
    let (wx, wy, s) = (spec.wrist_x, spec.wrist_y, spec.scale);
    let outward = if wx < 0.5 { 1.0 } else { -1.0 };
    let (fingers, thumb) = extended_digits(&spec.pose);

    let mut points = [Landmark::default(); LANDMARK_COUNT];
    points[WRIST] = Landmark::new(wx, wy);

    let thumb_shape = if thumb { THUMB_EXTENDED } else { THUMB_FOLDED };
    for (joint, (dx, dy)) in thumb_shape.into_iter().enumerate() {
        points[1 + joint] = Landmark::new(wx + outward * dx * s, wy + dy * s);
    }

    for finger in 0..4 {
        let x = wx + outward * (0.04 - 0.025 * finger as f32) * s;
        let shape = if finger < fingers {
            FINGER_EXTENDED
        } else {
            FINGER_FOLDED
        };
        for (joint, dy) in shape.into_iter().enumerate() {
            points[5 + finger * 4 + joint] = Landmark::new(x, wy + dy * s);
        }
    }

    if let Some(spread) = pinch_spread(&spec.pose, frame_index, spec.period) {
        let index_tip = points[INDEX_TIP];
        let offset = spread * FRAC_1_SQRT_2;
        points[THUMB_TIP] = Landmark::new(index_tip.x + outward * offset, index_tip.y + offset);
    }

    if jitter > 0.0 {
        for point in points.iter_mut() {
            point.x += rng.gen_range(-jitter..jitter);
            point.y += rng.gen_range(-jitter..jitter);
        }
    }

    Hand::new(points)
}
