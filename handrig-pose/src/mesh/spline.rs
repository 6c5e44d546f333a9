//! Catmull-Rom splines through control points

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Knot parameterization. Centripetal avoids cusps and self-intersections
/// on unevenly spaced points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Uniform,
    #[default]
    Centripetal,
    Chordal,
}

impl CurveKind {
    fn alpha(self) -> f32 {
        match self {
            CurveKind::Uniform => 0.0,
            CurveKind::Centripetal => 0.5,
            CurveKind::Chordal => 1.0,
        }
    }
}

/// Cubic coefficients of one segment: `c0 + c1 t + c2 t² + c3 t³`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Segment {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn point(&self, t: f32) -> Vec3 {
        self.c0 + t * (self.c1 + t * (self.c2 + t * self.c3))
    }

    fn derivative(&self, t: f32) -> Vec3 {
        self.c1 + t * (2.0 * self.c2 + t * 3.0 * self.c3)
    }
}

/// An interpolating C¹ spline passing through every control point.
///
/// Open curves extrapolate phantom end points; closed curves wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    points: Vec<Vec3>,
    closed: bool,
    kind: CurveKind,
}

impl CatmullRom {
    /// Returns `None` for fewer than two control points.
    pub fn new(points: Vec<Vec3>, closed: bool, kind: CurveKind) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self {
            points,
            closed,
            kind,
        })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    fn control(&self, index: isize) -> Vec3 {
        let n = self.points.len() as isize;
        if self.closed {
            return self.points[index.rem_euclid(n) as usize];
        }
        if index < 0 {
            2.0 * self.points[0] - self.points[1]
        } else if index >= n {
            let last = self.points.len() - 1;
            2.0 * self.points[last] - self.points[last - 1]
        } else {
            self.points[index as usize]
        }
    }

    /// Map a global parameter in `[0, 1]` to a segment and local parameter.
    fn locate(&self, t: f32) -> (usize, f32) {
        let count = self.segment_count();
        let scaled = t.clamp(0.0, 1.0) * count as f32;
        let index = (scaled.floor() as usize).min(count - 1);
        (index, scaled - index as f32)
    }

    fn segment(&self, index: usize) -> Segment {
        let i = index as isize;
        let p0 = self.control(i - 1);
        let p1 = self.control(i);
        let p2 = self.control(i + 1);
        let p3 = self.control(i + 2);

        let alpha = self.kind.alpha();
        if alpha == 0.0 {
            return Segment::hermite(p1, p2, 0.5 * (p2 - p0), 0.5 * (p3 - p1));
        }

        let power = alpha * 0.5;
        let mut dt0 = p0.distance_squared(p1).powf(power);
        let mut dt1 = p1.distance_squared(p2).powf(power);
        let mut dt2 = p2.distance_squared(p3).powf(power);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;
        Segment::hermite(p1, p2, t1, t2)
    }

    pub fn point(&self, t: f32) -> Vec3 {
        let (index, local) = self.locate(t);
        self.segment(index).point(local)
    }

    /// Unit tangent at `t`.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let (index, local) = self.locate(t);
        let segment = self.segment(index);
        match segment.derivative(local).try_normalize() {
            Some(tangent) => tangent,
            None => {
                let delta = 1e-3;
                let ahead = self.point((t + delta).min(1.0));
                let behind = self.point((t - delta).max(0.0));
                (ahead - behind).try_normalize().unwrap_or(Vec3::Y)
            }
        }
    }

    /// `divisions + 1` evenly spaced points from `t = 0` to `t = 1`.
    pub fn sample(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point(i as f32 / divisions as f32))
            .collect()
    }
}
