//! Last emitted state of one tracked joint or bone

use glam::{Quat, Vec3};

/// Held state for a single tracked entity.
///
/// `raw` is the last sample that passed the jitter gate: a scene position for
/// point joints, the unnormalized landmark-pair direction for bones. The
/// smoothed outputs are `position` and `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointState {
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub raw: Option<Vec3>,
    /// Orientation derived from `raw`, which `rotation` converges toward.
    pub target_rotation: Option<Quat>,
}

impl JointState {
    pub fn is_seeded(&self) -> bool {
        self.raw.is_some()
    }

    /// Raw displacement between `sample` and the last accepted sample.
    pub fn raw_step(&self, sample: Vec3) -> Option<f32> {
        self.raw.map(|r| (sample - r).length())
    }

    /// `p' = p + (target - p) * factor`. Seeds directly when empty.
    pub fn lerp_toward(&mut self, target: Vec3, factor: f32) -> Vec3 {
        let next = match self.position {
            Some(p) => p + (target - p) * factor,
            None => target,
        };
        self.position = Some(next);
        next
    }

    /// Spherical interpolation toward `target`. Seeds directly when empty.
    pub fn slerp_toward(&mut self, target: Quat, factor: f32) -> Quat {
        let next = match self.rotation {
            Some(q) => q.slerp(target, factor).normalize(),
            None => target,
        };
        self.rotation = Some(next);
        next
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
