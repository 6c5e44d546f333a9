//! In-memory rig representation

use glam::{Quat, Vec3};

use crate::types::Bounds;

/// A single bone with its local transform relative to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct RigBone {
    pub name: String,
    /// Index of the parent bone. Parents always precede their children.
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl RigBone {
    pub fn new(name: impl Into<String>, parent: Option<usize>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            translation,
            rotation: Quat::IDENTITY,
        }
    }
}

/// A loaded bone hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Rig {
    pub name: String,
    pub bones: Vec<RigBone>,
    /// World position of the hierarchy root.
    pub root_position: Vec3,
    /// Skin geometry bounds in rig space, when the asset provides them.
    pub mesh_bounds: Option<Bounds>,
}

impl Rig {
    pub fn new(name: impl Into<String>, bones: Vec<RigBone>) -> Self {
        Self {
            name: name.into(),
            bones,
            root_position: Vec3::ZERO,
            mesh_bounds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// World-space bone head positions via forward kinematics.
    pub fn world_positions(&self) -> Vec<Vec3> {
        let mut positions: Vec<Vec3> = Vec::with_capacity(self.bones.len());
        let mut rotations: Vec<Quat> = Vec::with_capacity(self.bones.len());

        for bone in &self.bones {
            let (position, rotation) = match bone.parent {
                Some(parent) if parent < positions.len() => (
                    positions[parent] + rotations[parent] * bone.translation,
                    rotations[parent] * bone.rotation,
                ),
                _ => (self.root_position + bone.translation, bone.rotation),
            };
            positions.push(position);
            rotations.push(rotation);
        }

        positions
    }

    /// Bounds of the rig geometry in world space.
    ///
    /// Uses the asset's skin bounds when present, otherwise the bone heads.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.mesh_bounds {
            Some(bounds) => Some(Bounds::new(
                bounds.min + self.root_position,
                bounds.max + self.root_position,
            )),
            None => Bounds::from_points(self.world_positions()),
        }
    }
}
