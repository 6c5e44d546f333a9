//! Landmark replay file loading

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::frame::message::{DecodeError, HandMessage, decode_messages};

/// Load every message from a replay file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_frames(path: impl AsRef<Path>) -> Result<Vec<HandMessage>, DecodeError> {
    debug!("Loading landmark messages");
    let text = fs::read_to_string(path.as_ref())?;
    let messages = decode_messages(&text)?;
    info!("Loaded {} landmark messages", messages.len());
    Ok(messages)
}
