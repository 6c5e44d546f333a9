//! Pose configuration – reads JSON files such as `pose.json`.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::mesh::{CurveKind, SynthesisParams};
use crate::retarget::{BindingTable, JOINT_TABLE, RestConventions};
use crate::smoothing::SmoothingParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What the procedural-mode camera follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraAnchor {
    #[default]
    Wrist,
    BoundsCenter,
}

/// Recognized pose pipeline options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Lerp factor applied to positions each accepted tick.
    #[serde(default = "default_smoothing")]
    pub position_smoothing: f32,

    /// Slerp factor applied to bone rotations each accepted tick.
    #[serde(default = "default_smoothing")]
    pub rotation_smoothing: f32,

    /// Scene-space displacement below which an update is skipped.
    #[serde(default = "default_jitter_threshold")]
    pub jitter_threshold: f32,

    #[serde(default = "default_finger_radius")]
    pub finger_radius: f32,

    /// Thumb tube radius as a multiple of `finger_radius`.
    #[serde(default = "default_thumb_radius_ratio")]
    pub thumb_radius_ratio: f32,

    #[serde(default = "default_palm_radius")]
    pub palm_radius: f32,

    #[serde(default = "default_tubular_segments")]
    pub tubular_segments: u32,

    #[serde(default = "default_radial_segments")]
    pub radial_segments: u32,

    #[serde(default)]
    pub curve_kind: CurveKind,

    /// Rigged-mode camera distance as a multiple of the rig's planar extent.
    #[serde(default = "default_camera_offset_factor")]
    pub camera_offset_factor: f32,

    #[serde(default = "default_camera_follow_smoothing")]
    pub camera_follow_smoothing: f32,

    #[serde(default = "default_camera_follow_offset")]
    pub camera_follow_offset: [f32; 3],

    #[serde(default)]
    pub camera_anchor: CameraAnchor,

    #[serde(default = "default_thumb_rest_axis")]
    pub thumb_rest_axis: [f32; 3],

    #[serde(default = "default_finger_rest_axis")]
    pub finger_rest_axis: [f32; 3],

    /// Render procedurally even when a rig loads.
    #[serde(default)]
    pub force_procedural: bool,

    /// Per-joint candidate bone names, replacing the built-in candidates.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bone_names: BTreeMap<String, Vec<String>>,
}

fn default_smoothing() -> f32 {
    0.3
}
fn default_jitter_threshold() -> f32 {
    0.01
}
fn default_finger_radius() -> f32 {
    0.02
}
fn default_thumb_radius_ratio() -> f32 {
    1.25
}
fn default_palm_radius() -> f32 {
    0.03
}
fn default_tubular_segments() -> u32 {
    24
}
fn default_radial_segments() -> u32 {
    8
}
fn default_camera_offset_factor() -> f32 {
    1.5
}
fn default_camera_follow_smoothing() -> f32 {
    0.1
}
fn default_camera_follow_offset() -> [f32; 3] {
    [0.0, 0.0, 2.0]
}
fn default_thumb_rest_axis() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}
fn default_finger_rest_axis() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            position_smoothing: default_smoothing(),
            rotation_smoothing: default_smoothing(),
            jitter_threshold: default_jitter_threshold(),
            finger_radius: default_finger_radius(),
            thumb_radius_ratio: default_thumb_radius_ratio(),
            palm_radius: default_palm_radius(),
            tubular_segments: default_tubular_segments(),
            radial_segments: default_radial_segments(),
            curve_kind: CurveKind::default(),
            camera_offset_factor: default_camera_offset_factor(),
            camera_follow_smoothing: default_camera_follow_smoothing(),
            camera_follow_offset: default_camera_follow_offset(),
            camera_anchor: CameraAnchor::default(),
            thumb_rest_axis: default_thumb_rest_axis(),
            finger_rest_axis: default_finger_rest_axis(),
            force_procedural: false,
            bone_names: BTreeMap::new(),
        }
    }
}

fn check_factor(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside (0, 1]"),
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be positive"),
        })
    }
}

fn check_axis(field: &'static str, axis: [f32; 3]) -> Result<(), ConfigError> {
    let axis = Vec3::from_array(axis);
    if axis.is_finite() && axis.length_squared() > 1e-12 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "axis must be finite and non-zero".to_string(),
        })
    }
}

impl PoseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_factor("position_smoothing", self.position_smoothing)?;
        check_factor("rotation_smoothing", self.rotation_smoothing)?;
        check_factor("camera_follow_smoothing", self.camera_follow_smoothing)?;
        if !(self.jitter_threshold.is_finite() && self.jitter_threshold >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "jitter_threshold",
                reason: format!("{} must be zero or positive", self.jitter_threshold),
            });
        }
        check_positive("finger_radius", self.finger_radius)?;
        check_positive("thumb_radius_ratio", self.thumb_radius_ratio)?;
        check_positive("palm_radius", self.palm_radius)?;
        check_positive("camera_offset_factor", self.camera_offset_factor)?;
        if self.tubular_segments < 2 {
            return Err(ConfigError::Invalid {
                field: "tubular_segments",
                reason: "need at least 2 segments".to_string(),
            });
        }
        if self.radial_segments < 3 {
            return Err(ConfigError::Invalid {
                field: "radial_segments",
                reason: "need at least 3 segments".to_string(),
            });
        }
        if !Vec3::from_array(self.camera_follow_offset).is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera_follow_offset",
                reason: "offset must be finite".to_string(),
            });
        }
        check_axis("thumb_rest_axis", self.thumb_rest_axis)?;
        check_axis("finger_rest_axis", self.finger_rest_axis)?;
        for joint in self.bone_names.keys() {
            if !JOINT_TABLE.iter().any(|spec| spec.name == joint) {
                return Err(ConfigError::Invalid {
                    field: "bone_names",
                    reason: format!("unknown joint '{joint}'"),
                });
            }
        }
        Ok(())
    }

    pub fn smoothing_params(&self) -> SmoothingParams {
        SmoothingParams {
            position_factor: self.position_smoothing,
            rotation_factor: self.rotation_smoothing,
            jitter_threshold: self.jitter_threshold,
        }
    }

    pub fn synthesis_params(&self) -> SynthesisParams {
        SynthesisParams {
            finger_radius: self.finger_radius,
            thumb_radius_ratio: self.thumb_radius_ratio,
            palm_radius: self.palm_radius,
            tubular_segments: self.tubular_segments,
            radial_segments: self.radial_segments,
            curve_kind: self.curve_kind,
            ..SynthesisParams::default()
        }
    }

    pub fn rest_conventions(&self) -> RestConventions {
        RestConventions::new(
            Vec3::from_array(self.thumb_rest_axis),
            Vec3::from_array(self.finger_rest_axis),
        )
    }

    pub fn binding_table(&self) -> BindingTable {
        let mut table = BindingTable::default();
        for (joint, names) in &self.bone_names {
            table.set_candidates(joint, names.clone());
        }
        table
    }
}

/// Load and validate a config file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<PoseConfig, ConfigError> {
    let file = File::open(path.as_ref())?;
    let config: PoseConfig = serde_json::from_reader(BufReader::new(file))?;
    config.validate()?;
    debug!(?config, "Loaded pose config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoseConfig::default();
        assert_eq!(config.position_smoothing, 0.3);
        assert_eq!(config.rotation_smoothing, 0.3);
        assert_eq!(config.jitter_threshold, 0.01);
        assert!(config.thumb_radius_ratio > 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PoseConfig =
            serde_json::from_str(r#"{"rotation_smoothing": 0.5, "camera_anchor": "bounds_center"}"#)
                .unwrap();
        assert_eq!(config.rotation_smoothing, 0.5);
        assert_eq!(config.position_smoothing, 0.3);
        assert_eq!(config.camera_anchor, CameraAnchor::BoundsCenter);
        assert_eq!(config.curve_kind, CurveKind::Centripetal);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = PoseConfig {
            position_smoothing: 0.0,
            ..PoseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "position_smoothing",
                ..
            })
        ));

        let config = PoseConfig {
            thumb_rest_axis: [0.0, 0.0, 0.0],
            ..PoseConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = PoseConfig::default();
        config
            .bone_names
            .insert("sixth_finger".to_string(), vec!["Bone".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bone_name_overrides_reach_binding_table() {
        let mut config = PoseConfig::default();
        config
            .bone_names
            .insert("thumb1".to_string(), vec!["Bone001_Armature".to_string()]);
        assert!(config.validate().is_ok());
        let table = config.binding_table();
        assert_eq!(table.candidates("thumb1"), Some(&["Bone001_Armature".to_string()][..]));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("handrig-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"jitter_threshold": 0.02, "force_procedural": true}"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.jitter_threshold, 0.02);
        assert!(config.force_procedural);
        std::fs::remove_file(&path).ok();
    }
}
