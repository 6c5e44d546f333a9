//! Rig assets: a flat bone hierarchy with local rest transforms.

mod loader;
mod model;

pub use loader::{RigLoadError, load_rig, parse_rig};
pub use model::{Rig, RigBone};
