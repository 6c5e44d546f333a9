//! Triangle meshes: tube sweeps along a spline and UV spheres

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

use handrig_data::Bounds;

use crate::mesh::CatmullRom;

/// Vertex layout handed to the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &TriMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.vertices.iter().map(MeshVertex::position))
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Rotation-minimizing frames along the curve.
///
/// Normals are parallel-transported from the first sample. On closed curves
/// the accumulated twist is spread evenly so the seam lines up.
fn transport_frames(curve: &CatmullRom, segments: usize) -> (Vec<Vec3>, Vec<Vec3>, Vec<Vec3>) {
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| curve.tangent(i as f32 / segments as f32))
        .collect();

    let t0 = tangents[0];
    let seed = if t0.x.abs() <= t0.y.abs() && t0.x.abs() <= t0.z.abs() {
        Vec3::X
    } else if t0.y.abs() <= t0.z.abs() {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let side = t0.cross(seed).normalize();

    let mut normals = Vec::with_capacity(segments + 1);
    normals.push(t0.cross(side));

    for i in 1..=segments {
        let mut normal = normals[i - 1];
        let axis = tangents[i - 1].cross(tangents[i]);
        if axis.length() > f32::EPSILON {
            let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
        }
        normals.push(normal);
    }

    if curve.is_closed() {
        let mut theta =
            normals[0].dot(normals[segments]).clamp(-1.0, 1.0).acos() / segments as f32;
        if tangents[0].dot(normals[0].cross(normals[segments])) > 0.0 {
            theta = -theta;
        }
        for (i, normal) in normals.iter_mut().enumerate().skip(1) {
            *normal = Quat::from_axis_angle(tangents[i], theta * i as f32) * *normal;
        }
    }

    let binormals = tangents
        .iter()
        .zip(&normals)
        .map(|(t, n)| t.cross(*n))
        .collect();

    (tangents, normals, binormals)
}

/// Sweep a circle of `radius` along `curve`.
pub fn sweep_tube(
    curve: &CatmullRom,
    radius: f32,
    tubular_segments: usize,
    radial_segments: usize,
) -> TriMesh {
    let tubular = tubular_segments.max(1);
    let radial = radial_segments.max(3);
    let (_, normals, binormals) = transport_frames(curve, tubular);

    let mut mesh = TriMesh {
        vertices: Vec::with_capacity((tubular + 1) * (radial + 1)),
        indices: Vec::with_capacity(tubular * radial * 6),
    };

    for i in 0..=tubular {
        let center = curve.point(i as f32 / tubular as f32);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let normal = (-v.cos() * normals[i] + v.sin() * binormals[i]).normalize();
            mesh.vertices.push(MeshVertex::new(center + radius * normal, normal));
        }
    }

    let stride = (radial + 1) as u32;
    for j in 1..=tubular as u32 {
        for i in 1..=radial as u32 {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// UV sphere centered at `center`.
pub fn sphere(center: Vec3, radius: f32, width_segments: usize, height_segments: usize) -> TriMesh {
    let width = width_segments.max(3);
    let height = height_segments.max(2);
    let mut mesh = TriMesh::default();

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.vertices.push(MeshVertex::new(center + radius * normal, normal));
        }
    }

    let stride = (width + 1) as u32;
    for iy in 0..height as u32 {
        for ix in 0..width as u32 {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height as u32 - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}
