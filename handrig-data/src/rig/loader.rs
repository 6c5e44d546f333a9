//! Rig asset loading from JSON

use glam::{Quat, Vec3};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::rig::{Rig, RigBone};
use crate::types::Bounds;

#[derive(Debug, Error)]
pub enum RigLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rig parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bone '{bone}' references unknown or later parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("Bone '{0}' has a degenerate rotation")]
    DegenerateRotation(String),

    #[error("Rig contains no bones")]
    Empty,
}

#[derive(Deserialize, Debug)]
struct BoneFile {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    rotation: [f32; 4],
}

#[derive(Deserialize, Debug)]
struct BoundsFile {
    min: [f32; 3],
    max: [f32; 3],
}

#[derive(Deserialize, Debug)]
struct RigFile {
    #[serde(default)]
    name: String,
    bones: Vec<BoneFile>,
    #[serde(default)]
    root_position: [f32; 3],
    #[serde(default)]
    bounds: Option<BoundsFile>,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// Load a rig from a JSON asset file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_rig(path: impl AsRef<Path>) -> Result<Rig, RigLoadError> {
    debug!("Loading rig asset");
    let file = File::open(path.as_ref())?;
    let rig_file: RigFile = serde_json::from_reader(BufReader::new(file))?;
    let rig = build_rig(rig_file)?;
    info!("Rig '{}' loaded: {} bones", rig.name, rig.len());
    Ok(rig)
}

/// Parse a rig from JSON text.
pub fn parse_rig(text: &str) -> Result<Rig, RigLoadError> {
    build_rig(serde_json::from_str(text)?)
}

fn build_rig(rig_file: RigFile) -> Result<Rig, RigLoadError> {
    if rig_file.bones.is_empty() {
        return Err(RigLoadError::Empty);
    }

    let mut bones: Vec<RigBone> = Vec::with_capacity(rig_file.bones.len());
    for bone in rig_file.bones {
        let parent = match bone.parent {
            Some(parent_name) => Some(
                bones
                    .iter()
                    .position(|b| b.name == parent_name)
                    .ok_or_else(|| RigLoadError::UnknownParent {
                        bone: bone.name.clone(),
                        parent: parent_name.clone(),
                    })?,
            ),
            None => None,
        };

        let rotation = Quat::from_array(bone.rotation);
        if !rotation.is_finite() || rotation.length_squared() < 1e-12 {
            return Err(RigLoadError::DegenerateRotation(bone.name));
        }

        bones.push(RigBone {
            name: bone.name,
            parent,
            translation: Vec3::from_array(bone.translation),
            rotation: rotation.normalize(),
        });
    }

    Ok(Rig {
        name: rig_file.name,
        bones,
        root_position: Vec3::from_array(rig_file.root_position),
        mesh_bounds: rig_file
            .bounds
            .map(|b| Bounds::new(Vec3::from_array(b.min), Vec3::from_array(b.max))),
    })
}
