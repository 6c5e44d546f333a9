//! Joint-to-bone binding resolution

use glam::Vec3;
use tracing::info;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::retarget::joints::{JOINT_TABLE, JointSpec, RestConvention, joint_index};
use crate::retarget::skeleton::{BoneId, Skeleton};

/// The two rest-direction conventions: thumb bones and every other finger bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestConventions {
    pub thumb: Vec3,
    pub finger: Vec3,
}

impl RestConventions {
    pub fn new(thumb: Vec3, finger: Vec3) -> Self {
        Self {
            thumb: thumb.try_normalize().unwrap_or(Vec3::X),
            finger: finger.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    pub fn direction(&self, convention: RestConvention) -> Vec3 {
        match convention {
            RestConvention::Thumb => self.thumb,
            RestConvention::Finger => self.finger,
        }
    }
}

impl Default for RestConventions {
    fn default() -> Self {
        Self::new(Vec3::X, Vec3::Y)
    }
}

/// Candidate bone names per semantic joint.
///
/// Resolution tries exact names first, then a case-insensitive substring
/// match, so the defaults cover rigs named `Thumb1`, `RightHandThumb1`,
/// `mixamorig:LeftHandIndex2` and similar.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTable {
    candidates: Vec<Vec<String>>,
}

impl Default for BindingTable {
    fn default() -> Self {
        let candidates = JOINT_TABLE
            .iter()
            .map(|spec| match spec.name {
                "wrist" => vec!["wrist".to_string(), "hand".to_string()],
                name => match name.strip_suffix("_tip") {
                    Some(finger) => vec![name.to_string(), format!("{finger}4")],
                    None => vec![name.to_string()],
                },
            })
            .collect();
        Self { candidates }
    }
}

impl BindingTable {
    /// Replace the candidates for `joint`. Returns false for unknown joints.
    pub fn set_candidates(&mut self, joint: &str, names: Vec<String>) -> bool {
        match joint_index(joint) {
            Some(index) => {
                self.candidates[index] = names;
                true
            }
            None => false,
        }
    }

    pub fn candidates(&self, joint: &str) -> Option<&[String]> {
        joint_index(joint).map(|index| self.candidates[index].as_slice())
    }
}

/// A semantic joint bound (or not) to a bone, plus its rest direction.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneBinding {
    pub joint: JointSpec,
    pub bone: Option<BoneId>,
    pub bone_name: Option<String>,
    pub rest_direction: Vec3,
}

impl BoneBinding {
    pub fn is_missing(&self) -> bool {
        self.bone.is_none()
    }
}

/// Bindings for every entry of [`JOINT_TABLE`], in table order.
///
/// Built once per rig instance. Missing entries are never retried.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneBindings {
    bindings: Vec<BoneBinding>,
}

impl BoneBindings {
    pub fn resolve(
        skeleton: &dyn Skeleton,
        table: &BindingTable,
        conventions: RestConventions,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        let bones = skeleton.bones();
        let lowered: Vec<String> = bones.iter().map(|b| b.name.to_lowercase()).collect();
        let mut claimed = vec![false; bones.len()];
        let mut resolved: Vec<Option<(usize, bool)>> = vec![None; JOINT_TABLE.len()];

        for (joint, names) in table.candidates.iter().enumerate() {
            let hit = names.iter().find_map(|name| {
                (0..bones.len()).find(|&k| !claimed[k] && bones[k].name == *name)
            });
            if let Some(k) = hit {
                claimed[k] = true;
                resolved[joint] = Some((k, true));
            }
        }

        for (joint, names) in table.candidates.iter().enumerate() {
            if resolved[joint].is_some() {
                continue;
            }
            let hit = names.iter().find_map(|name| {
                let needle = name.to_lowercase();
                (0..bones.len())
                    .filter(|&k| !claimed[k] && lowered[k].contains(&needle))
                    .min_by_key(|&k| (bones[k].name.len(), k))
            });
            if let Some(k) = hit {
                claimed[k] = true;
                resolved[joint] = Some((k, false));
            }
        }

        let bindings: Vec<BoneBinding> = JOINT_TABLE
            .iter()
            .zip(resolved)
            .map(|(spec, hit)| {
                let rest_direction = conventions.direction(spec.convention);
                match hit {
                    Some((k, exact)) => {
                        sink.emit(Diagnostic::BindingResolved {
                            joint: spec.name,
                            bone: bones[k].name.clone(),
                            exact,
                        });
                        BoneBinding {
                            joint: *spec,
                            bone: Some(bones[k].id),
                            bone_name: Some(bones[k].name.clone()),
                            rest_direction,
                        }
                    }
                    None => {
                        sink.emit(Diagnostic::UnresolvedBinding { joint: spec.name });
                        BoneBinding {
                            joint: *spec,
                            bone: None,
                            bone_name: None,
                            rest_direction,
                        }
                    }
                }
            })
            .collect();

        let result = Self { bindings };
        info!(
            "Resolved {}/{} joint bindings",
            result.resolved_count(),
            result.len()
        );
        result
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoneBinding> {
        self.bindings.iter()
    }

    pub fn get(&self, joint: &str) -> Option<&BoneBinding> {
        joint_index(joint).map(|index| &self.bindings[index])
    }

    pub fn resolved_count(&self) -> usize {
        self.bindings.iter().filter(|b| !b.is_missing()).count()
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.bindings
            .iter()
            .filter(|b| b.is_missing())
            .map(|b| b.joint.name)
            .collect()
    }
}
