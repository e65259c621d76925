//! Fixed 21-point hand topology.

/// Number of landmarks in every detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Bone segments drawn for the skeleton, as pairs of landmark indices.
pub const HAND_CONNECTIONS: [[usize; 2]; 20] = [
    [WRIST, THUMB_CMC],
    [THUMB_CMC, THUMB_MCP],
    [THUMB_MCP, THUMB_IP],
    [THUMB_IP, THUMB_TIP],
    [WRIST, INDEX_MCP],
    [INDEX_MCP, INDEX_PIP],
    [INDEX_PIP, INDEX_DIP],
    [INDEX_DIP, INDEX_TIP],
    [WRIST, MIDDLE_MCP],
    [MIDDLE_MCP, MIDDLE_PIP],
    [MIDDLE_PIP, MIDDLE_DIP],
    [MIDDLE_DIP, MIDDLE_TIP],
    [WRIST, RING_MCP],
    [RING_MCP, RING_PIP],
    [RING_PIP, RING_DIP],
    [RING_DIP, RING_TIP],
    [WRIST, PINKY_MCP],
    [PINKY_MCP, PINKY_PIP],
    [PINKY_PIP, PINKY_DIP],
    [PINKY_DIP, PINKY_TIP],
];

/// Tip/PIP pairs for the four long fingers, index through pinky.
pub const FINGER_TIP_PIP: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn connections_reference_valid_landmarks() {
        for [from, to] in HAND_CONNECTIONS {
            assert!(from < LANDMARK_COUNT);
            assert!(to < LANDMARK_COUNT);
            assert_ne!(from, to);
        }
    }

    #[test]
    fn skeleton_is_a_tree_over_all_joints() {
        let touched: HashSet<usize> = HAND_CONNECTIONS.iter().flatten().copied().collect();
        assert_eq!(touched.len(), LANDMARK_COUNT);
        // 21 nodes, 20 edges, every joint reached: a spanning tree rooted at the wrist.
        assert_eq!(HAND_CONNECTIONS.len(), LANDMARK_COUNT - 1);
    }
}
