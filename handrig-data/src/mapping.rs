//! Coordinate mapping from normalized landmark space to scene space.
//!
//! x is centered, y is flipped to point up and depth is negated so the hand
//! faces the camera in a right-handed scene.

use crate::landmarks::LANDMARK_COUNT;
use crate::types::{Landmark, LandmarkFrame, ScenePoint};

pub fn map(landmark: &Landmark) -> ScenePoint {
    ScenePoint::new(
        (landmark.x - 0.5) * 2.0,
        -(landmark.y - 0.5) * 2.0,
        -landmark.z * 2.0,
    )
}

/// Exact inverse of [`map`].
pub fn inverse_map(point: &ScenePoint) -> Landmark {
    let p = point.position;
    Landmark::new(p.x / 2.0 + 0.5, -p.y / 2.0 + 0.5, -p.z / 2.0)
}

pub fn map_frame(frame: &LandmarkFrame) -> [ScenePoint; LANDMARK_COUNT] {
    frame.landmarks().map(|l| map(&l))
}
