//! Landmark-pair to bone-rotation retargeting

use glam::{Quat, Vec3};

use handrig_data::{LANDMARK_COUNT, ScenePoint, WRIST};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::retarget::binding::BoneBindings;
use crate::retarget::joints::{JOINT_TABLE, WRIST_JOINT};
use crate::retarget::skeleton::Skeleton;
use crate::smoothing::{Gate, SmoothingParams, TemporalSmoother};

/// Minimal-angle rotation taking `from` onto `to`.
///
/// Inputs need not be normalized. Returns identity if either is zero.
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    match (from.try_normalize(), to.try_normalize()) {
        (Some(from), Some(to)) => Quat::from_rotation_arc(from, to),
        _ => Quat::IDENTITY,
    }
}

/// Per-frame counts from [`SkeletonRetargeter::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetargetReport {
    pub updated: usize,
    pub jitter: usize,
    /// Bones held on their last accepted target but still easing toward it.
    pub converging: usize,
    pub degenerate: usize,
    pub unbound: usize,
    pub root_moved: bool,
}

/// Drives a bound skeleton from mapped landmark frames.
///
/// Every bone is updated independently: a missing or skipped bone never
/// blocks its neighbours in the same chain.
#[derive(Debug, Clone)]
pub struct SkeletonRetargeter {
    bindings: BoneBindings,
    smoother: TemporalSmoother,
}

impl SkeletonRetargeter {
    pub fn new(bindings: BoneBindings, params: SmoothingParams) -> Self {
        Self {
            bindings,
            smoother: TemporalSmoother::new(JOINT_TABLE.len(), params),
        }
    }

    pub fn bindings(&self) -> &BoneBindings {
        &self.bindings
    }

    pub fn smoother(&self) -> &TemporalSmoother {
        &self.smoother
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    pub fn apply(
        &mut self,
        skeleton: &mut dyn Skeleton,
        points: &[ScenePoint; LANDMARK_COUNT],
        sink: &mut dyn DiagnosticSink,
    ) -> RetargetReport {
        let mut report = RetargetReport::default();

        if self
            .smoother
            .smooth_position(WRIST_JOINT, points[WRIST].position)
            .applied()
        {
            if let Some(root) = self.smoother.position(WRIST_JOINT) {
                skeleton.set_root_position(root);
                report.root_moved = true;
            }
        }

        for (slot, binding) in self.bindings.iter().enumerate() {
            let Some((proximal, distal)) = binding.joint.landmarks else {
                continue;
            };
            let Some(bone) = binding.bone else {
                report.unbound += 1;
                continue;
            };

            let direction = points[distal].position - points[proximal].position;
            let rest = binding.rest_direction;
            match self
                .smoother
                .smooth_direction(slot, direction, |d| shortest_arc(rest, d))
            {
                gate @ (Gate::Seeded | Gate::Updated | Gate::Converging) => {
                    if let Some(rotation) = self.smoother.rotation(slot) {
                        skeleton.set_local_rotation(bone, rotation);
                        if gate == Gate::Converging {
                            report.converging += 1;
                        } else {
                            report.updated += 1;
                        }
                    }
                }
                Gate::Jitter => report.jitter += 1,
                Gate::Degenerate => {
                    report.degenerate += 1;
                    sink.emit(Diagnostic::DegenerateDirection {
                        joint: binding.joint.name,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::retarget::binding::{BindingTable, RestConventions};
    use crate::retarget::skeleton::BoneId;
    use crate::test_support::{hand_rig, open_hand_landmarks};
    use handrig_data::{Landmark, LandmarkFrame, Rig, map, map_frame};

    fn retargeter_for(rig: &Rig, sink: &mut RecordingSink) -> SkeletonRetargeter {
        let bindings = BoneBindings::resolve(
            rig,
            &BindingTable::default(),
            RestConventions::default(),
            sink,
        );
        SkeletonRetargeter::new(bindings, SmoothingParams::default())
    }

    fn mapped(landmarks: Vec<Landmark>) -> [ScenePoint; LANDMARK_COUNT] {
        map_frame(&LandmarkFrame::new(landmarks).unwrap())
    }

    #[test]
    fn test_shortest_arc_thumb_scenario() {
        let wrist = map(&Landmark::new(0.5, 0.5, 0.0)).position;
        let tip = map(&Landmark::new(0.6, 0.4, -0.1)).position;
        let direction = (tip - wrist).normalize();

        let q = shortest_arc(Vec3::X, direction);
        assert!((q * Vec3::X).abs_diff_eq(direction, 1e-5));
        let expected_angle = (1.0_f32 / 3.0_f32.sqrt()).acos();
        assert!((q.to_axis_angle().1 - expected_angle).abs() < 1e-5);
        let (axis, _) = q.to_axis_angle();
        assert!(axis.dot(Vec3::X).abs() < 1e-5);
    }

    #[test]
    fn test_shortest_arc_edge_cases() {
        assert_eq!(shortest_arc(Vec3::ZERO, Vec3::X), Quat::IDENTITY);
        let flip = shortest_arc(Vec3::Y, -Vec3::Y);
        assert!((flip * Vec3::Y).abs_diff_eq(-Vec3::Y, 1e-5));
        let same = shortest_arc(Vec3::Z * 3.0, Vec3::Z);
        assert!(same.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_first_frame_points_bones_along_landmarks() {
        let mut rig = hand_rig(&[]);
        let mut sink = RecordingSink::new();
        let mut retargeter = retargeter_for(&rig, &mut sink);
        let points = mapped(open_hand_landmarks());

        let report = retargeter.apply(&mut rig, &points, &mut sink);
        assert_eq!(report.updated, 15);
        assert_eq!(report.unbound, 0);
        assert!(report.root_moved);
        assert!(rig.root_position.abs_diff_eq(points[WRIST].position, 1e-6));

        let index2 = rig.find("Index2").unwrap();
        let expected = (points[7].position - points[6].position).normalize();
        assert!((rig.bones[index2].rotation * Vec3::Y).abs_diff_eq(expected, 1e-4));

        let thumb3 = rig.find("Thumb3").unwrap();
        let expected = (points[4].position - points[3].position).normalize();
        assert!((rig.bones[thumb3].rotation * Vec3::X).abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_missing_ring2_leaves_other_bones_working() {
        let mut rig = hand_rig(&["Ring2"]);
        let mut sink = RecordingSink::new();
        let mut retargeter = retargeter_for(&rig, &mut sink);
        sink.drain();
        let points = mapped(open_hand_landmarks());

        let report = retargeter.apply(&mut rig, &points, &mut sink);
        assert_eq!(report.updated, 14);
        assert_eq!(report.unbound, 1);
        // Nothing is reported per frame for the unresolved joint.
        assert!(sink.snapshot().is_empty());

        let ring3 = rig.find("Ring3").unwrap();
        let expected = (points[16].position - points[15].position).normalize();
        assert!((rig.bones[ring3].rotation * Vec3::Y).abs_diff_eq(expected, 1e-4));
        let ring1 = rig.find("Ring1").unwrap();
        assert!(rig.bones[ring1].rotation != Quat::IDENTITY);
    }

    #[test]
    fn test_jitter_frame_keeps_rotations() {
        let mut rig = hand_rig(&[]);
        let mut sink = RecordingSink::new();
        let mut retargeter = retargeter_for(&rig, &mut sink);
        let landmarks = open_hand_landmarks();
        retargeter.apply(&mut rig, &mapped(landmarks.clone()), &mut sink);
        let before = rig.clone();

        let mut nudged = landmarks;
        nudged[8].x += 0.002;
        let report = retargeter.apply(&mut rig, &mapped(nudged), &mut sink);
        assert_eq!(report.updated, 0);
        assert_eq!(report.jitter, 15);
        assert_eq!(rig, before);
    }

    #[test]
    fn test_held_pose_keeps_easing_after_a_jump() {
        let mut rig = hand_rig(&[]);
        let mut sink = RecordingSink::new();
        let mut retargeter = retargeter_for(&rig, &mut sink);
        let landmarks = open_hand_landmarks();
        retargeter.apply(&mut rig, &mapped(landmarks.clone()), &mut sink);

        let mut bent = landmarks;
        bent[8].x += 0.1;
        bent[8].y += 0.1;
        let points = mapped(bent);
        let report = retargeter.apply(&mut rig, &points, &mut sink);
        assert_eq!(report.updated, 1);

        let index3 = rig.find("Index3").unwrap();
        let target = (points[8].position - points[7].position).normalize();
        let mut previous = (rig.bones[index3].rotation * Vec3::Y).angle_between(target);
        let report = retargeter.apply(&mut rig, &points, &mut sink);
        assert_eq!(report.converging, 1);
        assert_eq!(report.jitter, 14);
        assert!(!report.root_moved);

        for _ in 0..40 {
            retargeter.apply(&mut rig, &points, &mut sink);
            let error = (rig.bones[index3].rotation * Vec3::Y).angle_between(target);
            assert!(error <= previous + 1e-4);
            previous = error;
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn test_degenerate_pair_only_skips_that_bone() {
        let mut rig = hand_rig(&[]);
        let mut sink = RecordingSink::new();
        let mut retargeter = retargeter_for(&rig, &mut sink);
        sink.drain();
        let mut landmarks = open_hand_landmarks();
        landmarks[7] = landmarks[6];

        let report = retargeter.apply(&mut rig, &mapped(landmarks), &mut sink);
        assert_eq!(report.degenerate, 1);
        assert_eq!(report.updated, 14);
        assert_eq!(
            sink.snapshot(),
            vec![Diagnostic::DegenerateDirection { joint: "index2" }]
        );
        let index2 = rig.find("Index2").unwrap();
        assert_eq!(rig.local_rotation(BoneId(index2)), Some(Quat::IDENTITY));
    }
}
