//! Debug channel framing.
//!
//! Every message on the wire is:
//!
//! ```text
//! ┌──────────────┬────────────────┬───────────────┐
//! │ type: u16 BE │ length: u32 BE │ payload bytes │
//! └──────────────┴────────────────┴───────────────┘
//! ```

use std::io::{self, Read};

/// Size of the fixed header preceding every payload.
pub const HEADER_LEN: usize = 6;

/// Reload the modules listed in the payload (JSON array of dotted names).
pub const RELOAD_MODULES: u16 = 2;

/// One decoded debug-channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: u16,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(kind: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Build a [`RELOAD_MODULES`] message for `modules`.
    pub fn reload_modules(modules: &[String]) -> Self {
        let payload = serde_json::Value::from(modules).to_string();
        Self::new(RELOAD_MODULES, payload)
    }

    pub fn encode(&self) -> io::Result<Vec<u8>> {
        encode_frame(self.kind, &self.payload)
    }
}

/// Frame `payload` as a single wire message.
///
/// Fails only when the payload does not fit the 32-bit length field.
pub fn encode_frame(kind: u16, payload: &[u8]) -> io::Result<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds frame limit", payload.len()),
        )
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&kind.to_be_bytes());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Read exactly one framed message from `reader`.
///
/// A clean EOF before the header yields `UnexpectedEof`, same as a
/// truncated payload.
pub fn read_message<R: Read>(reader: &mut R) -> io::Result<Message> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    let kind = u16::from_be_bytes([header[0], header[1]]);
    let len = u32::from_be_bytes([header[2], header[3], header[4], header[5]]) as usize;

    // Grow with the bytes actually received; the length field is untrusted.
    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(Message { kind, payload })
}
