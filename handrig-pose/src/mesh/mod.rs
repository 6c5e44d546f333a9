//! Procedural hand geometry
//!
//! Fingers and palm are rendered as tubes swept along Catmull-Rom splines
//! through the smoothed landmarks, with a sphere capping each fingertip. The
//! whole set is rebuilt from scratch every frame.

pub mod spline;
pub mod synthesizer;
pub mod tube;

pub use spline::{CatmullRom, CurveKind};
pub use synthesizer::{
    FingerMesh, MeshSet, PalmMesh, ProceduralMeshSynthesizer, SynthesisError, SynthesisParams,
};
pub use tube::{MeshVertex, TriMesh, sphere, sweep_tube};
