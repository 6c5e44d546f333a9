//! Wire messages carrying one landmark frame each

use serde::Deserialize;
use thiserror::Error;

use crate::types::{FrameError, Landmark, LandmarkFrame};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("No landmark messages found")]
    Empty,
}

/// One decoded message. The landmark list is not validated yet; validation
/// happens when it is turned into a [`LandmarkFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct HandMessage {
    pub hand_id: Option<String>,
    pub landmarks: Vec<Landmark>,
}

impl HandMessage {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            hand_id: None,
            landmarks,
        }
    }

    pub fn into_frame(self) -> Result<LandmarkFrame, FrameError> {
        LandmarkFrame::new(self.landmarks)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLandmark {
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
    Array([f32; 3]),
}

impl From<WireLandmark> for Landmark {
    fn from(wire: WireLandmark) -> Self {
        match wire {
            WireLandmark::Object { x, y, z } => Landmark::new(x, y, z),
            WireLandmark::Array([x, y, z]) => Landmark::new(x, y, z),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireMessage {
    Envelope {
        #[serde(default)]
        hand_id: Option<String>,
        landmarks: Vec<WireLandmark>,
    },
    Bare(Vec<WireLandmark>),
}

impl From<WireMessage> for HandMessage {
    fn from(wire: WireMessage) -> Self {
        match wire {
            WireMessage::Envelope { hand_id, landmarks } => HandMessage {
                hand_id,
                landmarks: landmarks.into_iter().map(Landmark::from).collect(),
            },
            WireMessage::Bare(landmarks) => {
                HandMessage::new(landmarks.into_iter().map(Landmark::from).collect())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDocument {
    Many(Vec<WireMessage>),
    One(WireMessage),
}

/// Decode a single message.
pub fn decode_message(text: &str) -> Result<HandMessage, DecodeError> {
    serde_json::from_str::<WireMessage>(text)
        .map(HandMessage::from)
        .map_err(|source| DecodeError::Json { line: 1, source })
}

/// Decode a whole document: a JSON array of messages, a single message, or
/// one message per line.
pub fn decode_messages(text: &str) -> Result<Vec<HandMessage>, DecodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    if let Ok(document) = serde_json::from_str::<WireDocument>(trimmed) {
        let messages: Vec<HandMessage> = match document {
            WireDocument::Many(messages) => messages.into_iter().map(HandMessage::from).collect(),
            WireDocument::One(message) => vec![message.into()],
        };
        if messages.is_empty() {
            return Err(DecodeError::Empty);
        }
        return Ok(messages);
    }

    let mut messages = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message = serde_json::from_str::<WireMessage>(line)
            .map_err(|source| DecodeError::Json { line: i + 1, source })?;
        messages.push(message.into());
    }

    if messages.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(messages)
}
