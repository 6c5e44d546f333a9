//! Fixed-size bank of joint states with a shared jitter gate

use glam::{Quat, Vec3};

use crate::smoothing::JointState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub position_factor: f32,
    pub rotation_factor: f32,
    pub jitter_threshold: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            position_factor: 0.3,
            rotation_factor: 0.3,
            jitter_threshold: 0.01,
        }
    }
}

/// Residual angle (radians) below which a bone counts as settled on its
/// accepted target. Below this, gated ticks leave the rotation untouched.
pub const SETTLED_ANGLE: f32 = 1e-3;

/// Outcome of offering a target to one joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// First sample for this joint; state taken as-is.
    Seeded,
    Updated,
    /// Raw step from the last accepted sample below the threshold; nothing touched.
    Jitter,
    /// Bone sample gated as jitter, but the rotation had not yet settled on the
    /// last accepted target and advanced one step toward it.
    Converging,
    /// Direction vector too short to define a rotation; nothing touched.
    Degenerate,
}

impl Gate {
    pub fn applied(self) -> bool {
        matches!(self, Gate::Seeded | Gate::Updated | Gate::Converging)
    }
}

/// Per-joint low-pass filter.
///
/// The number of tracked joints is fixed at construction. Indexing past it
/// panics, like slice indexing.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    params: SmoothingParams,
    states: Vec<JointState>,
}

impl TemporalSmoother {
    pub fn new(count: usize, params: SmoothingParams) -> Self {
        Self {
            params,
            states: vec![JointState::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    pub fn state(&self, index: usize) -> &JointState {
        &self.states[index]
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.states[index].position
    }

    pub fn rotation(&self, index: usize) -> Option<Quat> {
        self.states[index].rotation
    }

    /// Smoothed positions of every joint, `None` for joints never seeded.
    pub fn positions(&self) -> Vec<Option<Vec3>> {
        self.states.iter().map(|s| s.position).collect()
    }

    fn is_jitter(&self, index: usize, sample: Vec3) -> bool {
        self.states[index]
            .raw_step(sample)
            .is_some_and(|step| step < self.params.jitter_threshold)
    }

    /// Move a point joint toward `target`.
    ///
    /// A target within the threshold of the last accepted one is dropped and
    /// the held position stays exactly as it was.
    pub fn smooth_position(&mut self, index: usize, target: Vec3) -> Gate {
        if self.is_jitter(index, target) {
            return Gate::Jitter;
        }
        let factor = self.params.position_factor;
        let state = &mut self.states[index];
        let seeded = state.is_seeded();
        state.raw = Some(target);
        state.lerp_toward(target, factor);
        if seeded { Gate::Updated } else { Gate::Seeded }
    }

    /// Move a bone toward the orientation implied by `direction`.
    ///
    /// `target_rotation` receives the normalized direction and is only called
    /// for samples that pass the gate. A gated sample keeps the previous
    /// target, and the rotation keeps slerping toward it until it settles
    /// within [`SETTLED_ANGLE`]. The residual is therefore independent of
    /// bone length.
    pub fn smooth_direction(
        &mut self,
        index: usize,
        direction: Vec3,
        target_rotation: impl FnOnce(Vec3) -> Quat,
    ) -> Gate {
        let length = direction.length();
        if !(length >= self.params.jitter_threshold) || length <= f32::EPSILON {
            return Gate::Degenerate;
        }
        let factor = self.params.rotation_factor;

        if self.is_jitter(index, direction) {
            let state = &mut self.states[index];
            return match (state.rotation, state.target_rotation) {
                (Some(held), Some(target)) if held.angle_between(target) > SETTLED_ANGLE => {
                    state.slerp_toward(target, factor);
                    Gate::Converging
                }
                _ => Gate::Jitter,
            };
        }

        let target = target_rotation(direction / length);
        let state = &mut self.states[index];
        let seeded = state.is_seeded();
        state.raw = Some(direction);
        state.target_rotation = Some(target);
        state.slerp_toward(target, factor);
        if seeded { Gate::Updated } else { Gate::Seeded }
    }

    pub fn reset(&mut self) {
        self.states.iter_mut().for_each(JointState::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retarget::shortest_arc;

    #[test]
    fn test_dimension_is_fixed() {
        let mut smoother = TemporalSmoother::new(21, SmoothingParams::default());
        smoother.smooth_position(3, Vec3::ONE);
        smoother.reset();
        assert_eq!(smoother.len(), 21);
        assert!(smoother.position(3).is_none());
    }

    #[test]
    fn test_jitter_gate_leaves_position_unchanged() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        assert_eq!(smoother.smooth_position(0, Vec3::new(0.2, 0.1, 0.0)), Gate::Seeded);
        let held = smoother.position(0);

        let gate = smoother.smooth_position(0, Vec3::new(0.205, 0.1, 0.0));
        assert_eq!(gate, Gate::Jitter);
        assert_eq!(smoother.position(0), held);
    }

    #[test]
    fn test_sub_threshold_step_is_gated_mid_convergence() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        smoother.smooth_position(0, Vec3::ZERO);
        assert_eq!(smoother.smooth_position(0, Vec3::X), Gate::Updated);
        let held = smoother.position(0);
        assert!((held.unwrap().x - 0.3).abs() < 1e-6);

        let gate = smoother.smooth_position(0, Vec3::X + Vec3::new(0.005, 0.0, 0.0));
        assert_eq!(gate, Gate::Jitter);
        assert_eq!(smoother.position(0), held);
    }

    #[test]
    fn test_slow_drift_is_measured_from_last_accepted_sample() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        smoother.smooth_position(0, Vec3::ZERO);
        let step = Vec3::new(0.004, 0.0, 0.0);

        assert_eq!(smoother.smooth_position(0, step), Gate::Jitter);
        assert_eq!(smoother.smooth_position(0, step * 2.0), Gate::Jitter);
        assert_eq!(smoother.smooth_position(0, step * 3.0), Gate::Updated);
        assert_eq!(smoother.state(0).raw, Some(step * 3.0));
    }

    #[test]
    fn test_position_converges_by_factor_per_tick() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        smoother.smooth_position(0, Vec3::ZERO);
        let target = Vec3::new(1.0, 0.0, 0.0);

        // The landmark wobbles past the gate each tick, so every sample lands.
        let mut expected = 1.0_f32;
        for tick in 0..10 {
            let sample = target + Vec3::new(0.0, 0.02 * (tick % 2) as f32, 0.0);
            assert_eq!(smoother.smooth_position(0, sample), Gate::Updated);
            expected *= 0.7;
            let error = target.x - smoother.position(0).unwrap().x;
            assert!((error - expected).abs() < 1e-5);
        }
        let previous_error = (target - smoother.position(0).unwrap()).length();
        assert!(previous_error < 0.05);
    }

    #[test]
    fn test_degenerate_direction_is_skipped() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        let gate = smoother.smooth_direction(0, Vec3::new(0.001, 0.0, 0.0), |d| {
            shortest_arc(Vec3::X, d)
        });
        assert_eq!(gate, Gate::Degenerate);
        assert!(smoother.rotation(0).is_none());
        assert!(smoother.position(0).is_none());
    }

    #[test]
    fn test_direction_jitter_keeps_rotation() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        let first = Vec3::new(0.0, 0.2, 0.0);
        smoother.smooth_direction(0, first, |d| shortest_arc(Vec3::X, d));
        let held = smoother.rotation(0);

        let gate = smoother.smooth_direction(0, first + Vec3::new(0.004, 0.0, 0.0), |d| {
            shortest_arc(Vec3::X, d)
        });
        assert_eq!(gate, Gate::Jitter);
        assert_eq!(smoother.rotation(0), held);
    }

    #[test]
    fn test_rotation_converges_monotonically() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        smoother.smooth_direction(0, Vec3::X, |d| shortest_arc(Vec3::X, d));
        let target = shortest_arc(Vec3::X, Vec3::Y);

        let mut previous = smoother.rotation(0).unwrap().angle_between(target);
        for _ in 0..8 {
            smoother.smooth_direction(0, Vec3::Y, |d| shortest_arc(Vec3::X, d));
            let error = smoother.rotation(0).unwrap().angle_between(target);
            assert!(error < previous);
            assert!((error - previous * 0.7).abs() < 1e-3);
            previous = error;
        }

        for _ in 0..40 {
            smoother.smooth_direction(0, Vec3::Y, |d| shortest_arc(Vec3::X, d));
        }
        let error = smoother.rotation(0).unwrap().angle_between(target);
        assert!(error < 0.02);
    }

    #[test]
    fn test_short_bone_settles_on_target() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        let length = 0.06;
        smoother.smooth_direction(0, Vec3::Y * length, |d| shortest_arc(Vec3::Y, d));
        let target = shortest_arc(Vec3::Y, Vec3::Z);

        assert_eq!(
            smoother.smooth_direction(0, Vec3::Z * length, |d| shortest_arc(Vec3::Y, d)),
            Gate::Updated
        );
        let mut previous = smoother.rotation(0).unwrap().angle_between(target);
        for _ in 0..30 {
            let gate = smoother.smooth_direction(0, Vec3::Z * length, |d| shortest_arc(Vec3::Y, d));
            let error = smoother.rotation(0).unwrap().angle_between(target);
            if gate == Gate::Converging {
                assert!(error <= previous);
            }
            previous = error;
        }
        assert!(previous < 0.01);

        for _ in 0..170 {
            smoother.smooth_direction(0, Vec3::Z * length, |d| shortest_arc(Vec3::Y, d));
        }
        let settled = smoother.rotation(0);
        assert!(settled.unwrap().angle_between(target) < 2.0 * SETTLED_ANGLE);
        assert_eq!(
            smoother.smooth_direction(0, Vec3::Z * length, |d| shortest_arc(Vec3::Y, d)),
            Gate::Jitter
        );
        assert_eq!(smoother.rotation(0), settled);
    }

    #[test]
    fn test_settled_bone_ignores_sub_threshold_noise() {
        let mut smoother = TemporalSmoother::new(1, SmoothingParams::default());
        let first = Vec3::new(0.0, 0.06, 0.0);
        smoother.smooth_direction(0, first, |d| shortest_arc(Vec3::Y, d));
        let held = smoother.rotation(0);

        for nudge in [0.003, -0.004, 0.002] {
            let gate = smoother.smooth_direction(0, first + Vec3::new(nudge, 0.0, 0.0), |d| {
                shortest_arc(Vec3::Y, d)
            });
            assert_eq!(gate, Gate::Jitter);
            assert_eq!(smoother.rotation(0), held);
        }
    }
}
