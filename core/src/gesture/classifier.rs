use crate::gesture::side::DisplaySide;
use crate::landmarks::topology::{FINGER_TIP_PIP, INDEX_TIP, THUMB_IP, THUMB_TIP};
use crate::landmarks::Hand;
use crate::math::GeometryHelper;
use serde::{Deserialize, Serialize};

/// Output levels for the eight brightness buckets.
pub const BRIGHTNESS_LEVELS: [u8; 8] = [0, 36, 73, 109, 146, 182, 218, 255];

/// Tuning for the pinch-distance quantizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Factor applied to the normalized thumb-index distance before bucketing.
    pub distance_scale: f32,
    /// Width of each brightness bucket in scaled units.
    pub bucket_step: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            distance_scale: 1000.0,
            bucket_step: 56.0,
        }
    }
}

/// Per-hand metrics, recomputed on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureMetrics {
    pub finger_count: u8,
    pub brightness_level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, hand: &Hand, side: DisplaySide) -> GestureMetrics {
        GestureMetrics {
            finger_count: Self::count_fingers(hand, side),
            brightness_level: self.brightness_level(self.pinch_distance(hand)),
        }
    }

    /// Counts extended digits with one independent comparison per digit.
    ///
    /// The thumb points outward, which flips with the display side; the other
    /// four fingers count when the tip sits above the PIP joint.
    pub fn count_fingers(hand: &Hand, side: DisplaySide) -> u8 {
        let mut count = u8::from(Self::thumb_extended(hand, side));
        for (tip, pip) in FINGER_TIP_PIP {
            if hand.landmark(tip).y < hand.landmark(pip).y {
                count += 1;
            }
        }
        count
    }

    pub fn thumb_extended(hand: &Hand, side: DisplaySide) -> bool {
        let tip = hand.landmark(THUMB_TIP);
        let ip = hand.landmark(THUMB_IP);
        match side {
            DisplaySide::Right => tip.x > ip.x,
            DisplaySide::Left => tip.x < ip.x,
        }
    }

    /// Thumb-tip to index-tip distance, scaled for bucketing.
    pub fn pinch_distance(&self, hand: &Hand) -> f32 {
        GeometryHelper::distance(&hand.landmark(THUMB_TIP), &hand.landmark(INDEX_TIP))
            * self.config.distance_scale
    }

    /// Quantizes a scaled distance into one of [`BRIGHTNESS_LEVELS`].
    ///
    /// A distance equal to a bucket threshold lands in the upper bucket; the
    /// last bucket absorbs everything beyond it.
    pub fn brightness_level(&self, scaled_distance: f32) -> u8 {
        let step = self.config.bucket_step;
        let bucket = (1..BRIGHTNESS_LEVELS.len())
            .take_while(|&k| scaled_distance >= step * k as f32)
            .count();
        BRIGHTNESS_LEVELS[bucket]
    }
}
