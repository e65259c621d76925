//! Hand fixtures shared by the unit tests.

use crate::landmarks::topology::LANDMARK_COUNT;
use crate::landmarks::{DetectedHand, DetectionResult, Hand, Handedness, Landmark};

fn outward(wrist_x: f32) -> f32 {
    if wrist_x < 0.5 {
        1.0
    } else {
        -1.0
    }
}

fn build(wrist_x: f32, extended: bool) -> Hand {
    let d = outward(wrist_x);
    let mut points = [Landmark::default(); LANDMARK_COUNT];
    points[0] = Landmark::new(wrist_x, 0.80);

    let thumb = if extended {
        [(0.04, 0.76), (0.08, 0.72), (0.11, 0.68), (0.14, 0.64)]
    } else {
        [(0.04, 0.76), (0.07, 0.73), (0.08, 0.70), (0.03, 0.68)]
    };
    for (i, (dx, y)) in thumb.into_iter().enumerate() {
        points[1 + i] = Landmark::new(wrist_x + d * dx, y);
    }

    let finger_y = if extended {
        [0.65, 0.57, 0.51, 0.46]
    } else {
        [0.65, 0.60, 0.66, 0.68]
    };
    for finger in 0..4 {
        let x = wrist_x + d * (0.04 - 0.025 * finger as f32);
        for (joint, y) in finger_y.into_iter().enumerate() {
            points[5 + finger * 4 + joint] = Landmark::new(x, y);
        }
    }
    Hand::new(points)
}

pub fn open_palm(wrist_x: f32) -> Hand {
    build(wrist_x, true)
}

pub fn closed_fist(wrist_x: f32) -> Hand {
    build(wrist_x, false)
}

/// Open palm at wrist x 0.3 with caller-applied edits.
pub fn hand_with(edit: impl FnOnce(&mut Vec<Landmark>)) -> Hand {
    let mut points: Vec<Landmark> = open_palm(0.3).into();
    edit(&mut points);
    Hand::try_from(points).expect("edit must keep 21 landmarks")
}

pub fn detections(hands: Vec<Hand>) -> DetectionResult {
    DetectionResult::new(
        hands
            .into_iter()
            .map(|hand| DetectedHand::new(hand, Handedness::Right))
            .collect(),
    )
}
