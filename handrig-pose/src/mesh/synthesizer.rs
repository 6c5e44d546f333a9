//! Procedural hand mesh built directly from smoothed landmark positions

use glam::Vec3;
use thiserror::Error;
use tracing::debug;

use handrig_data::{Bounds, Finger, LANDMARK_COUNT, PALM_RING};

use crate::mesh::spline::{CatmullRom, CurveKind};
use crate::mesh::tube::{TriMesh, sphere, sweep_tube};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("Expected {expected} points for synthesis, got {actual}")]
    InvalidPointCount { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParams {
    pub finger_radius: f32,
    /// Thumb radius as a multiple of `finger_radius`.
    pub thumb_radius_ratio: f32,
    pub palm_radius: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub curve_kind: CurveKind,
    pub tip_width_segments: u32,
    pub tip_height_segments: u32,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            finger_radius: 0.02,
            thumb_radius_ratio: 1.25,
            palm_radius: 0.03,
            tubular_segments: 24,
            radial_segments: 8,
            curve_kind: CurveKind::Centripetal,
            tip_width_segments: 8,
            tip_height_segments: 6,
        }
    }
}

impl SynthesisParams {
    pub fn radius_for(&self, finger: Finger) -> f32 {
        match finger {
            Finger::Thumb => self.finger_radius * self.thumb_radius_ratio,
            _ => self.finger_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FingerMesh {
    pub finger: Finger,
    pub control_points: Vec<Vec3>,
    pub radius: f32,
    pub tube: TriMesh,
    /// Sphere capping the distal end, same radius as the tube.
    pub tip: TriMesh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalmMesh {
    pub control_points: Vec<Vec3>,
    pub radius: f32,
    pub tube: TriMesh,
}

/// The complete procedural hand for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSet {
    pub fingers: Vec<FingerMesh>,
    pub palm: PalmMesh,
}

impl MeshSet {
    pub fn finger(&self, finger: Finger) -> Option<&FingerMesh> {
        self.fingers.iter().find(|f| f.finger == finger)
    }

    /// Spline control points of every tube: fingers first, palm last.
    pub fn control_points(&self) -> Vec<&[Vec3]> {
        self.fingers
            .iter()
            .map(|f| f.control_points.as_slice())
            .chain(std::iter::once(self.palm.control_points.as_slice()))
            .collect()
    }

    /// Every tube and cap merged into one triangle list.
    pub fn combined(&self) -> TriMesh {
        let mut mesh = TriMesh::default();
        for finger in &self.fingers {
            mesh.append(&finger.tube);
            mesh.append(&finger.tip);
        }
        mesh.append(&self.palm.tube);
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.fingers
            .iter()
            .map(|f| f.tube.vertex_count() + f.tip.vertex_count())
            .sum::<usize>()
            + self.palm.tube.vertex_count()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.combined().bounds()
    }
}

/// Rebuilds the hand mesh from scratch each frame.
///
/// A frame with the wrong point count is skipped and the last good mesh set
/// stays in place.
#[derive(Debug, Clone)]
pub struct ProceduralMeshSynthesizer {
    params: SynthesisParams,
    current: Option<MeshSet>,
    generation: u64,
}

impl ProceduralMeshSynthesizer {
    pub fn new(params: SynthesisParams) -> Self {
        Self {
            params,
            current: None,
            generation: 0,
        }
    }

    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }

    /// Mesh set from the most recent successful synthesis.
    pub fn current(&self) -> Option<&MeshSet> {
        self.current.as_ref()
    }

    /// Number of successful rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn synthesize(&mut self, points: &[Vec3]) -> Result<&MeshSet, SynthesisError> {
        if points.len() != LANDMARK_COUNT {
            return Err(SynthesisError::InvalidPointCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        let mesh_set = build_mesh_set(&self.params, points);
        self.generation += 1;
        debug!(
            generation = self.generation,
            vertices = mesh_set.vertex_count(),
            "Rebuilt procedural hand mesh"
        );
        Ok(self.current.insert(mesh_set))
    }
}

impl Default for ProceduralMeshSynthesizer {
    fn default() -> Self {
        Self::new(SynthesisParams::default())
    }
}

fn build_mesh_set(params: &SynthesisParams, points: &[Vec3]) -> MeshSet {
    let tubular = params.tubular_segments as usize;
    let radial = params.radial_segments as usize;

    let fingers = Finger::ALL
        .iter()
        .map(|&finger| {
            let control_points: Vec<Vec3> =
                finger.spline_indices().iter().map(|&i| points[i]).collect();
            let radius = params.radius_for(finger);
            let tube = CatmullRom::new(control_points.clone(), false, params.curve_kind)
                .map(|curve| sweep_tube(&curve, radius, tubular, radial))
                .unwrap_or_default();
            let tip = sphere(
                points[finger.tip()],
                radius,
                params.tip_width_segments as usize,
                params.tip_height_segments as usize,
            );
            FingerMesh {
                finger,
                control_points,
                radius,
                tube,
                tip,
            }
        })
        .collect();

    let palm_points: Vec<Vec3> = PALM_RING.iter().map(|&i| points[i]).collect();
    let palm_tube = CatmullRom::new(palm_points.clone(), true, params.curve_kind)
        .map(|curve| sweep_tube(&curve, params.palm_radius, tubular * 2, radial))
        .unwrap_or_default();

    MeshSet {
        fingers,
        palm: PalmMesh {
            control_points: palm_points,
            radius: params.palm_radius,
            tube: palm_tube,
        },
    }
}
