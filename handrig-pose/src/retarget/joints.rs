//! Semantic joint table

use handrig_data::landmarks::*;

/// Which rest-direction convention a bone follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestConvention {
    Thumb,
    Finger,
}

/// A semantic joint: its name, the landmark pair that drives it and its
/// rest convention. `landmarks` is `None` for the wrist root and for tip
/// bones, which are bound but never rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointSpec {
    pub name: &'static str,
    pub landmarks: Option<(usize, usize)>,
    pub convention: RestConvention,
}

const fn thumb(name: &'static str, proximal: usize, distal: usize) -> JointSpec {
    JointSpec {
        name,
        landmarks: Some((proximal, distal)),
        convention: RestConvention::Thumb,
    }
}

const fn finger(name: &'static str, proximal: usize, distal: usize) -> JointSpec {
    JointSpec {
        name,
        landmarks: Some((proximal, distal)),
        convention: RestConvention::Finger,
    }
}

const fn passive(name: &'static str) -> JointSpec {
    JointSpec {
        name,
        landmarks: None,
        convention: RestConvention::Finger,
    }
}

/// Index of the wrist (root) joint in [`JOINT_TABLE`].
pub const WRIST_JOINT: usize = 0;

pub const JOINT_TABLE: [JointSpec; 20] = [
    passive("wrist"),
    thumb("thumb1", THUMB_CMC, THUMB_MCP),
    thumb("thumb2", THUMB_MCP, THUMB_IP),
    thumb("thumb3", THUMB_IP, THUMB_TIP),
    finger("index1", INDEX_MCP, INDEX_PIP),
    finger("index2", INDEX_PIP, INDEX_DIP),
    finger("index3", INDEX_DIP, INDEX_TIP),
    passive("index_tip"),
    finger("middle1", MIDDLE_MCP, MIDDLE_PIP),
    finger("middle2", MIDDLE_PIP, MIDDLE_DIP),
    finger("middle3", MIDDLE_DIP, MIDDLE_TIP),
    passive("middle_tip"),
    finger("ring1", RING_MCP, RING_PIP),
    finger("ring2", RING_PIP, RING_DIP),
    finger("ring3", RING_DIP, RING_TIP),
    passive("ring_tip"),
    finger("pinky1", PINKY_MCP, PINKY_PIP),
    finger("pinky2", PINKY_PIP, PINKY_DIP),
    finger("pinky3", PINKY_DIP, PINKY_TIP),
    passive("pinky_tip"),
];

pub fn joint_index(name: &str) -> Option<usize> {
    JOINT_TABLE.iter().position(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(JOINT_TABLE[WRIST_JOINT].name, "wrist");
        let driven = JOINT_TABLE.iter().filter(|j| j.landmarks.is_some()).count();
        assert_eq!(driven, 15);
        let thumbs = JOINT_TABLE
            .iter()
            .filter(|j| j.convention == RestConvention::Thumb)
            .count();
        assert_eq!(thumbs, 3);
        assert_eq!(joint_index("ring2"), Some(13));
    }

    #[test]
    fn test_pairs_are_consecutive_landmarks() {
        for spec in JOINT_TABLE.iter() {
            if let Some((proximal, distal)) = spec.landmarks {
                assert_eq!(distal, proximal + 1, "{}", spec.name);
            }
        }
    }
}
