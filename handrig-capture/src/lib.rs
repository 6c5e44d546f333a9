//! Handrig Capture - Landmark sources and background loading
//!
//! This crate sits between the outside world and `handrig-pose`:
//!
//! - [`LandmarkSource`]: anything that yields hand landmark messages
//! - [`ReplaySource`]: replays a recorded JSON/JSON-lines file
//! - [`spawn_feeder`]: a transport thread posting a source into a [`FrameMailbox`]
//! - [`spawn_rig_load`]: loads a rig asset off the update thread
//!
//! ## Example
//!
//! ```ignore
//! use handrig_capture::{ReplaySource, spawn_feeder, spawn_rig_load};
//! use handrig_pose::{HandModel, PoseConfig, TracingSink};
//!
//! let mut model = HandModel::new(PoseConfig::default(), Box::new(TracingSink));
//! model.begin_loading(spawn_rig_load("hand.json"));
//! let feeder = spawn_feeder(ReplaySource::from_path("take.jsonl")?, model.mailbox(), 30.0)?;
//! loop {
//!     model.tick();
//! }
//! ```
//!
//! [`FrameMailbox`]: handrig_pose::FrameMailbox

mod feeder;
mod replay;
mod rig_loader;
mod source;

pub use feeder::{FeederHandle, FeederStats, spawn_feeder};
pub use replay::ReplaySource;
pub use rig_loader::spawn_rig_load;
pub use source::{CaptureError, LandmarkSource};
