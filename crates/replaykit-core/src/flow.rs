//! Flow records as delivered by the storage collaborator.
//!
//! Two byte sources coexist on a message: `data` carries the payload as text
//! (used by the HTTP path) and `b64` carries the exact bytes base64-encoded
//! (used by the raw-socket path). They are read through separate accessors
//! and never mixed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::error::{ReplayError, Result};

/// Which side of the connection sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Direction {
    #[serde(rename = "c")]
    Client,
    #[serde(rename = "s")]
    Server,
}

/// One directional unit of a flow.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub from: Direction,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub b64: Option<String>,
    /// Capture timestamp; carried through but never rendered.
    #[serde(default)]
    pub time: Option<serde_json::Value>,
}

impl Message {
    pub fn client_text(data: impl Into<String>) -> Self {
        Self::with_text(Direction::Client, data.into())
    }

    pub fn server_text(data: impl Into<String>) -> Self {
        Self::with_text(Direction::Server, data.into())
    }

    /// Build a message carrying raw bytes (stored base64-encoded).
    pub fn raw(from: Direction, bytes: &[u8]) -> Self {
        Self {
            from,
            data: None,
            b64: Some(STANDARD.encode(bytes)),
            time: None,
        }
    }

    fn with_text(from: Direction, data: String) -> Self {
        Self {
            from,
            data: Some(data),
            b64: None,
            time: None,
        }
    }

    pub fn is_client(&self) -> bool {
        self.from == Direction::Client
    }

    /// Payload bytes for the HTTP path (`data` field, UTF-8).
    pub fn text_bytes(&self) -> Result<&[u8]> {
        self.data
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| ReplayError::MalformedFlow("message has no `data` field".into()))
    }

    /// Payload bytes for the raw-socket path (`b64` field).
    pub fn raw_bytes(&self) -> Result<Vec<u8>> {
        let encoded = self
            .b64
            .as_deref()
            .ok_or_else(|| ReplayError::MalformedFlow("message has no `b64` field".into()))?;
        STANDARD
            .decode(encoded.trim())
            .map_err(|e| ReplayError::MalformedFlow(format!("invalid base64 payload: {e}")))
    }
}

/// A captured, ordered exchange between a client and a service.
#[derive(Debug, Clone, Deserialize)]
pub struct Flow {
    #[serde(default)]
    pub dst_port: Option<i64>,
    #[serde(default, rename = "flow")]
    pub messages: Vec<Message>,
}

impl Flow {
    pub fn new(dst_port: u16, messages: Vec<Message>) -> Self {
        Self {
            dst_port: Some(i64::from(dst_port)),
            messages,
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| ReplayError::MalformedFlow(format!("invalid flow json: {e}")))
    }

    pub fn from_slice(b: &[u8]) -> Result<Self> {
        serde_json::from_slice(b)
            .map_err(|e| ReplayError::MalformedFlow(format!("invalid flow json: {e}")))
    }

    /// Destination port used for the target address.
    pub fn port(&self) -> Result<u16> {
        let port = self
            .dst_port
            .ok_or_else(|| ReplayError::MalformedFlow("missing dst_port".into()))?;
        match u16::try_from(port) {
            Ok(p) if p != 0 => Ok(p),
            _ => Err(ReplayError::MalformedFlow(format!("dst_port out of range: {port}"))),
        }
    }

    pub fn client_messages(&self) -> impl Iterator<Item = (usize, &Message)> {
        self.messages.iter().enumerate().filter(|(_, m)| m.is_client())
    }
}
