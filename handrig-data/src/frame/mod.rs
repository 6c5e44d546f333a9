//! Landmark frame decoding
//!
//! Frames arrive from the tracker either bare (an array of landmarks) or in a
//! `{ "hand_id", "landmarks" }` envelope. Each landmark may be an `{x, y, z}`
//! object or an `[x, y, z]` array.

mod loader;
mod message;

pub use loader::load_frames;
pub use message::{DecodeError, HandMessage, decode_message, decode_messages};
