//! Hand landmark index table.
//!
//! Index order is fixed by the tracker: the wrist first, then five chains
//! ordered proximal to distal.

/// Number of landmarks in one tracked hand.
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

/// Line segments for a debug skeleton overlay (parent, child).
pub const HAND_CONNECTIONS: [(usize, usize); 20] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// Palm outline: wrist plus each finger's proximal landmark. Closed back to the wrist.
pub const PALM_RING: [usize; 6] = [WRIST, THUMB_CMC, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark indices of this finger, proximal to distal.
    pub fn chain(self) -> [usize; 4] {
        match self {
            Finger::Thumb => [THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP],
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    /// Control points for the procedural finger tube.
    ///
    /// The thumb's CMC sits on the palm outline, so its tube starts at the MCP.
    pub fn spline_indices(self) -> &'static [usize] {
        match self {
            Finger::Thumb => &[THUMB_MCP, THUMB_IP, THUMB_TIP],
            Finger::Index => &[INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => &[MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => &[RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => &[PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    pub fn tip(self) -> usize {
        self.chain()[3]
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chains_cover_all_non_wrist_landmarks() {
        let mut seen: Vec<usize> = Finger::ALL.iter().flat_map(|f| f.chain()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..LANDMARK_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_spline_indices() {
        assert_eq!(Finger::Thumb.spline_indices(), &[2, 3, 4]);
        assert_eq!(Finger::Ring.spline_indices(), &[13, 14, 15, 16]);
        assert_eq!(Finger::Pinky.tip(), PINKY_TIP);
    }

    #[test]
    fn test_connections_are_parent_child_pairs() {
        for (parent, child) in HAND_CONNECTIONS {
            assert!(parent < child);
            assert!(child < LANDMARK_COUNT);
        }
    }
}
