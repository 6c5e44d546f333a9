//! Typed access to an externally owned bone hierarchy.

use glam::{Quat, Vec3};

use handrig_data::{Bounds, Rig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

/// A bone as seen by the retargeter: an id and a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneNode {
    pub id: BoneId,
    pub name: String,
}

/// The capabilities the retargeter needs from a loaded rig.
pub trait Skeleton: Send {
    /// Flat list of every bone in the hierarchy.
    fn bones(&self) -> Vec<BoneNode>;

    fn local_rotation(&self, bone: BoneId) -> Option<Quat>;

    fn set_local_rotation(&mut self, bone: BoneId, rotation: Quat);

    fn set_root_position(&mut self, position: Vec3);

    /// World-space bounds of the rig geometry.
    fn bounds(&self) -> Option<Bounds>;
}

impl Skeleton for Rig {
    fn bones(&self) -> Vec<BoneNode> {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, bone)| BoneNode {
                id: BoneId(i),
                name: bone.name.clone(),
            })
            .collect()
    }

    fn local_rotation(&self, bone: BoneId) -> Option<Quat> {
        self.bones.get(bone.0).map(|b| b.rotation)
    }

    fn set_local_rotation(&mut self, bone: BoneId, rotation: Quat) {
        if let Some(b) = self.bones.get_mut(bone.0) {
            b.rotation = rotation;
        }
    }

    fn set_root_position(&mut self, position: Vec3) {
        self.root_position = position;
    }

    fn bounds(&self) -> Option<Bounds> {
        Rig::bounds(self)
    }
}
