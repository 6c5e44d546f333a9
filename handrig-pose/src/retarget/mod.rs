//! Skeleton retargeting
//!
//! Bindings from semantic hand joints to rig bones are resolved once when a
//! rig becomes available. Each frame, landmark pairs are turned into
//! bone-local rotations and smoothed per bone.

pub mod binding;
pub mod joints;
pub mod retargeter;
pub mod skeleton;
pub mod state;

pub use binding::{BindingTable, BoneBinding, BoneBindings, RestConventions};
pub use joints::{JOINT_TABLE, JointSpec, RestConvention};
pub use retargeter::{RetargetReport, SkeletonRetargeter, shortest_arc};
pub use skeleton::{BoneId, BoneNode, Skeleton};
pub use state::RigState;
