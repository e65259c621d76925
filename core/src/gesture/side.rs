use crate::landmarks::Hand;
use serde::{Deserialize, Serialize};

/// Horizontal midpoint of the normalized frame.
pub const MIRROR_MIDPOINT: f32 = 0.5;

/// Which half of the mirrored display a hand occupies.
///
/// Derived from the wrist position on every frame and deliberately unrelated
/// to the detector's anatomical [`crate::landmarks::Handedness`]: a wrist in
/// the left half of the raw frame appears on the viewer's right once the
/// selfie view is flipped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DisplaySide {
    Left,
    Right,
}

impl DisplaySide {
    pub fn from_wrist_x(palm_x: f32) -> Self {
        if palm_x < MIRROR_MIDPOINT {
            Self::Right
        } else {
            Self::Left
        }
    }

    pub fn of(hand: &Hand) -> Self {
        Self::from_wrist_x(hand.wrist().x)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_half_of_raw_frame_is_right_side() {
        assert_eq!(DisplaySide::from_wrist_x(0.1), DisplaySide::Right);
        assert_eq!(DisplaySide::from_wrist_x(0.499), DisplaySide::Right);
    }

    #[test]
    fn midpoint_belongs_to_left_side() {
        assert_eq!(DisplaySide::from_wrist_x(0.5), DisplaySide::Left);
        assert_eq!(DisplaySide::from_wrist_x(0.9), DisplaySide::Left);
    }

    #[test]
    fn opposite_flips() {
        assert_eq!(DisplaySide::Left.opposite(), DisplaySide::Right);
        assert_eq!(DisplaySide::Right.opposite(), DisplaySide::Left);
    }
}
