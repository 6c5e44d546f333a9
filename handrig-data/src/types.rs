//! Core data types for landmark frames and scene-space points.
//!
//! These are CPU-side representations shared by every handrig crate.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::landmarks::{LANDMARK_COUNT, WRIST};

/// One tracked hand point: normalized image-plane x/y plus relative depth z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Reasons a frame is rejected before entering the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A fully validated frame of exactly 21 finite landmarks.
///
/// Construction is the only validation point: a `LandmarkFrame` that exists
/// is always complete, so partial frames can never be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate and take ownership of a raw landmark list.
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, FrameError> {
        if let Some(index) = landmarks.iter().position(|l| !l.is_finite()) {
            return Err(FrameError::NonFinite { index });
        }
        let actual = landmarks.len();
        let landmarks: [Landmark; LANDMARK_COUNT] =
            landmarks.try_into().map_err(|_| FrameError::WrongCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;
        Ok(Self { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }
}

/// A landmark after coordinate mapping, in right-handed scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScenePoint {
    pub position: Vec3,
}

impl ScenePoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }
}

impl From<ScenePoint> for Vec3 {
    fn from(point: ScenePoint) -> Self {
        point.position
    }
}

impl From<Vec3> for ScenePoint {
    fn from(position: Vec3) -> Self {
        Self { position }
    }
}

/// Axis-aligned bounds computed from a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns `None` for an empty iterator.
    pub fn from_points(positions: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut positions = positions.into_iter();
        let first = positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent in the image plane (x or y).
    pub fn max_planar_extent(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_landmarks() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(0.5, i as f32 * 0.01, 0.0))
            .collect()
    }

    #[test]
    fn test_frame_accepts_21_finite_landmarks() {
        let frame = LandmarkFrame::new(valid_landmarks()).unwrap();
        assert_eq!(frame.landmarks().len(), LANDMARK_COUNT);
        assert_eq!(frame.wrist(), Landmark::new(0.5, 0.0, 0.0));
        assert!(frame.get(21).is_none());
    }

    #[test]
    fn test_frame_rejects_short_frame() {
        let mut landmarks = valid_landmarks();
        landmarks.pop();
        assert_eq!(
            LandmarkFrame::new(landmarks),
            Err(FrameError::WrongCount {
                expected: 21,
                actual: 20
            })
        );
    }

    #[test]
    fn test_frame_rejects_non_finite() {
        let mut landmarks = valid_landmarks();
        landmarks[7].z = f32::NAN;
        assert_eq!(
            LandmarkFrame::new(landmarks),
            Err(FrameError::NonFinite { index: 7 })
        );

        let mut landmarks = valid_landmarks();
        landmarks[3].x = f32::INFINITY;
        assert!(LandmarkFrame::new(landmarks).is_err());
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 4.0, 1.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.max_planar_extent(), 6.0);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }
}
