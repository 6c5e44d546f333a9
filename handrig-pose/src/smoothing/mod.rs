//! Temporal smoothing for tracked joints
//!
//! Positions are lerped and rotations slerped toward each new target. A
//! jitter gate suppresses samples within a threshold of the last accepted one,
//! since near-zero direction vectors yield unstable or flipped rotations.

pub mod joint_state;
pub mod smoother;

pub use joint_state::JointState;
pub use smoother::{Gate, SmoothingParams, TemporalSmoother};
