//! Handrig Pose Crate
//!
//! Turns a stream of 21-point hand landmark frames into a stable hand pose,
//! either by retargeting a loaded rig or by rebuilding a procedural tube mesh
//! from the smoothed points.
//!
//! ## Modules
//!
//! - [`config`]: Pose configuration and validation
//! - [`smoothing`]: Per-joint position/rotation smoothing with a jitter gate
//! - [`retarget`]: Bone bindings and landmark-to-bone rotation retargeting
//! - [`mesh`]: Catmull-Rom splines, tube sweeps and the procedural hand mesh
//! - [`camera`]: Camera framing for rigged and procedural modes
//! - [`ingest`]: Single-slot mailbox between the transport and the update pass
//! - [`model`]: The per-tick update pass tying everything together

pub mod camera;
pub mod config;
pub mod diagnostics;
pub mod ingest;
pub mod mesh;
pub mod model;
pub mod retarget;
pub mod smoothing;

pub use camera::{CameraFraming, CameraPose};
pub use config::{CameraAnchor, ConfigError, PoseConfig, load_config};
pub use diagnostics::{ChannelSink, Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use ingest::{Delivery, FrameMailbox, MailboxStats};
pub use mesh::{CatmullRom, CurveKind, MeshSet, MeshVertex, ProceduralMeshSynthesizer, TriMesh};
pub use model::{HandModel, RenderMode, TickReport};
pub use retarget::{
    BindingTable, BoneBindings, BoneId, BoneNode, RigState, RestConventions, Skeleton,
    SkeletonRetargeter, shortest_arc,
};
pub use smoothing::{Gate, JointState, SmoothingParams, TemporalSmoother};

#[cfg(test)]
mod test_support;
