use glam::{Mat4, Vec3};
use tracing::debug;

use handrig_data::Bounds;

use crate::config::{CameraAnchor, PoseConfig};

/// Camera pose representing position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Point the camera looks at.
    pub center: Vec3,
    /// Camera position in world space.
    pub position: Vec3,
    /// Yaw angle in radians (rotation around Y axis).
    pub yaw: f32,
    /// Pitch angle in radians (rotation around X axis).
    pub pitch: f32,
    /// Roll angle in radians (rotation around Z axis).
    pub roll: f32,
}

impl CameraPose {
    /// Create a new camera pose at `position` looking at `center`.
    pub fn new(position: Vec3, center: Vec3) -> Self {
        let forward = (center - position).normalize_or_zero();
        let yaw = forward.x.atan2(-forward.z);
        let pitch = forward
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        Self {
            center,
            position,
            yaw,
            pitch,
            roll: 0.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.center - self.position).normalize_or_zero()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.center).length()
    }

    /// Right-handed view matrix looking from `position` toward `center`.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = if right == Vec3::ZERO {
            Vec3::Z
        } else {
            right.cross(forward).normalize_or_zero()
        };
        Mat4::look_to_rh(self.position, forward, up)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO)
    }
}

/// Keeps the tracked hand in view.
///
/// Rigged mode snaps once to the rig's bounding box via [`frame_bounds`].
/// Procedural mode calls [`follow`] every tick, which blends the camera toward
/// an offset from the chosen anchor instead of snapping.
///
/// [`frame_bounds`]: CameraFraming::frame_bounds
/// [`follow`]: CameraFraming::follow
#[derive(Debug, Clone)]
pub struct CameraFraming {
    offset_factor: f32,
    follow_factor: f32,
    follow_offset: Vec3,
    anchor: CameraAnchor,
    pose: CameraPose,
}

impl CameraFraming {
    pub fn new(
        offset_factor: f32,
        follow_factor: f32,
        follow_offset: Vec3,
        anchor: CameraAnchor,
    ) -> Self {
        Self {
            offset_factor,
            follow_factor,
            follow_offset,
            anchor,
            pose: CameraPose::default(),
        }
    }

    pub fn from_config(config: &PoseConfig) -> Self {
        Self::new(
            config.camera_offset_factor,
            config.camera_follow_smoothing,
            Vec3::from_array(config.camera_follow_offset),
            config.camera_anchor,
        )
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    pub fn reset(&mut self) {
        self.pose = CameraPose::default();
    }

    /// Place the camera on +Z from the box center, backed off by the box's
    /// largest planar dimension times the offset factor.
    pub fn frame_bounds(&mut self, bounds: &Bounds) -> CameraPose {
        let center = bounds.center();
        let distance = bounds.max_planar_extent() * self.offset_factor;
        self.pose = CameraPose::new(center + Vec3::Z * distance, center);
        debug!(?center, distance, "Framed camera on rig bounds");
        self.pose
    }

    /// Blend the camera one step toward `anchor + follow_offset` and look at
    /// the anchor. An empty point set leaves the pose untouched.
    pub fn follow(&mut self, points: &[Vec3]) -> CameraPose {
        let Some(anchor) = self.anchor_point(points) else {
            return self.pose;
        };
        let target = anchor + self.follow_offset;
        let position = self.pose.position.lerp(target, self.follow_factor);
        self.pose = CameraPose::new(position, anchor);
        self.pose
    }

    fn anchor_point(&self, points: &[Vec3]) -> Option<Vec3> {
        match self.anchor {
            CameraAnchor::Wrist => points.first().copied(),
            CameraAnchor::BoundsCenter => {
                Bounds::from_points(points.iter().copied()).map(|b| b.center())
            }
        }
    }
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self::from_config(&PoseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bounds_backs_off_along_z() {
        let mut framing = CameraFraming::new(1.5, 0.1, Vec3::Z * 2.0, CameraAnchor::Wrist);
        let bounds = Bounds::new(Vec3::new(-1.0, 0.0, -0.5), Vec3::new(1.0, 4.0, 0.5));
        let pose = framing.frame_bounds(&bounds);

        assert_eq!(pose.center, Vec3::new(0.0, 2.0, 0.0));
        assert!((pose.position - Vec3::new(0.0, 2.0, 6.0)).length() < 1e-5);
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(framing.pose(), pose);
    }

    #[test]
    fn test_follow_blends_toward_wrist() {
        let mut framing = CameraFraming::new(1.5, 0.1, Vec3::Z * 2.0, CameraAnchor::Wrist);
        let wrist = Vec3::new(1.0, 0.0, 0.0);
        let target = wrist + Vec3::Z * 2.0;

        let mut previous = (framing.pose().position - target).length();
        for _ in 0..10 {
            let pose = framing.follow(&[wrist, Vec3::ONE]);
            let error = (pose.position - target).length();
            assert!(error < previous);
            assert!((error - previous * 0.9).abs() < 1e-4);
            assert_eq!(pose.center, wrist);
            previous = error;
        }
    }

    #[test]
    fn test_follow_bounds_center_anchor() {
        let mut framing = CameraFraming::new(1.5, 1.0, Vec3::Z, CameraAnchor::BoundsCenter);
        let pose = framing.follow(&[Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 3.0, 0.0)]);
        assert_eq!(pose.center, Vec3::new(0.0, 1.0, 0.0));
        assert!((pose.position - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_follow_without_points_keeps_pose() {
        let mut framing = CameraFraming::default();
        let before = framing.pose();
        assert_eq!(framing.follow(&[]), before);
    }

    #[test]
    fn test_view_matrix_maps_center_onto_forward_axis() {
        let pose = CameraPose::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        let view = pose.view_matrix();
        let center = view.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }
}
