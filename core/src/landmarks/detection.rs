use crate::landmarks::landmark::{Handedness, Landmark};
use crate::landmarks::topology::{LANDMARK_COUNT, WRIST};
use crate::prelude::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};

/// One hand's landmarks in the fixed 21-point topology.
///
/// Length is enforced on construction, so every index in
/// [`crate::landmarks::topology`] is always in bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }

    /// Index of the first landmark with a NaN or infinite coordinate.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.landmarks.iter().position(|landmark| !landmark.is_finite())
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = OverlayError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        let actual = landmarks.len();
        let landmarks = <[Landmark; LANDMARK_COUNT]>::try_from(landmarks).map_err(|_| {
            OverlayError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual,
            }
        })?;
        Ok(Self { landmarks })
    }
}

impl From<Hand> for Vec<Landmark> {
    fn from(hand: Hand) -> Self {
        hand.landmarks.to_vec()
    }
}

/// A hand together with the detector's labels for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    pub hand: Hand,
    pub handedness: Handedness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl DetectedHand {
    pub fn new(hand: Hand, handedness: Handedness) -> Self {
        Self {
            hand,
            handedness,
            score: None,
        }
    }

    /// Attaches the detector's handedness confidence.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Everything the detector found in one frame.
///
/// Results are immutable once built; a newer result replaces an older one
/// wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub hands: Vec<DetectedHand>,
}

impl DetectionResult {
    pub fn new(hands: Vec<DetectedHand>) -> Self {
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from the detector's parallel arrays, validating that
    /// every landmark set has 21 points and a matching handedness label.
    pub fn from_parts(
        landmarks: Vec<Vec<Landmark>>,
        handedness: Vec<Handedness>,
    ) -> OverlayResult<Self> {
        if landmarks.len() != handedness.len() {
            return Err(OverlayError::MismatchedHandedness {
                landmarks: landmarks.len(),
                handedness: handedness.len(),
            });
        }

        let hands = landmarks
            .into_iter()
            .zip(handedness)
            .map(|(points, label)| Ok(DetectedHand::new(Hand::try_from(points)?, label)))
            .collect::<OverlayResult<Vec<_>>>()?;

        Ok(Self { hands })
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(count: usize) -> Vec<Landmark> {
        (0..count)
            .map(|i| Landmark::new(i as f32 / 40.0, 0.5))
            .collect()
    }

    #[test]
    fn hand_rejects_short_landmark_sets() {
        let err = Hand::try_from(points(20)).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::InvalidLandmarkCount {
                expected: 21,
                actual: 20
            }
        ));
    }

    #[test]
    fn from_parts_requires_matching_labels() {
        let err = DetectionResult::from_parts(vec![points(21), points(21)], vec![Handedness::Left])
            .unwrap_err();
        assert!(matches!(err, OverlayError::MismatchedHandedness { .. }));
    }

    #[test]
    fn from_parts_keeps_detection_order() {
        let result = DetectionResult::from_parts(
            vec![points(21), points(21)],
            vec![Handedness::Right, Handedness::Left],
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.hands[0].handedness, Handedness::Right);
        assert_eq!(result.hands[1].handedness, Handedness::Left);
    }

    #[test]
    fn deserializing_validates_hand_length() {
        let json = r#"{"hands":[{"hand":[{"x":0.1,"y":0.2}],"handedness":"Left"}]}"#;
        assert!(serde_json::from_str::<DetectionResult>(json).is_err());

        let hand = Hand::try_from(points(21)).unwrap();
        let encoded = serde_json::to_string(&DetectionResult::new(vec![DetectedHand::new(
            hand.clone(),
            Handedness::Left,
        )]))
        .unwrap();
        let decoded: DetectionResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.hands[0].hand, hand);
    }

    #[test]
    fn score_is_carried_through_json() {
        let hand = Hand::try_from(points(21)).unwrap();
        let scored = DetectedHand::new(hand.clone(), Handedness::Right).with_score(0.8);
        assert_eq!(scored.score, Some(0.8));

        let decoded: DetectedHand =
            serde_json::from_str(&serde_json::to_string(&scored).unwrap()).unwrap();
        assert_eq!(decoded.score, Some(0.8));

        let unscored = serde_json::to_string(&DetectedHand::new(hand, Handedness::Right)).unwrap();
        assert!(!unscored.contains("score"));
    }

    #[test]
    fn non_finite_landmarks_are_located() {
        let mut raw = points(21);
        raw[9].y = f32::NAN;
        let hand = Hand::try_from(raw).unwrap();
        assert_eq!(hand.first_non_finite(), Some(9));
    }
}
