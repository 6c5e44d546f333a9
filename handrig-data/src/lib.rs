//! Handrig Data Crate
//!
//! Landmark frames, coordinate mapping and rig asset loading.
//! This crate is renderer-agnostic and focuses on parsing, validating and
//! transforming the tracking input before it reaches the pose pipeline.

pub mod frame;
pub mod landmarks;
pub mod mapping;
pub mod rig;
pub mod types;

pub use frame::{DecodeError, HandMessage, decode_message, decode_messages, load_frames};
pub use landmarks::{Finger, HAND_CONNECTIONS, LANDMARK_COUNT, PALM_RING, WRIST};
pub use mapping::{inverse_map, map, map_frame};
pub use rig::{Rig, RigBone, RigLoadError, load_rig};
pub use types::{Bounds, FrameError, Landmark, LandmarkFrame, ScenePoint};
