//! # Protocol Registry
//!
//! Maps a small integer protocol id to the pair of total functions that
//! render a payload to bytes and interpret decrypted bytes back into a
//! payload. The registry is open for extension: new protocols plug in
//! without touching the fragmentation logic.
//!
//! Id 2 (UTF-8 text) ships enabled; every other id is rejected until
//! registered.

use crate::config::{MAX_PROTOCOL_ID, PROTOCOL_UTF8_TEXT};
use crate::error::{constants, ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A decoded payload, tagged by interpretation.
///
/// Callers match exhaustively; the protocol id returned alongside the payload
/// says which registered codec produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// UTF-8 text (protocol id 2).
    Utf8(String),
    /// Raw bytes, for extension protocols without a richer interpretation.
    Bytes(Vec<u8>),
}

/// Render/interpret pair for one protocol id.
pub trait ProtocolCodec: Send + Sync {
    /// Render a payload value to the bytes that get encrypted.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidInput` if the payload variant does not
    /// belong to this protocol.
    fn render(&self, payload: &Payload) -> Result<Vec<u8>>;

    /// Interpret decrypted bytes as a payload value.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidInput` if the bytes are malformed for
    /// this protocol.
    fn interpret(&self, bytes: &[u8]) -> Result<Payload>;
}

/// UTF-8 text payloads.
struct Utf8Text;

impl ProtocolCodec for Utf8Text {
    fn render(&self, payload: &Payload) -> Result<Vec<u8>> {
        match payload {
            Payload::Utf8(text) => Ok(text.as_bytes().to_vec()),
            Payload::Bytes(_) => Err(ProtocolError::InvalidInput(
                constants::ERR_PAYLOAD_MISMATCH.to_string(),
            )),
        }
    }

    fn interpret(&self, bytes: &[u8]) -> Result<Payload> {
        String::from_utf8(bytes.to_vec())
            .map(Payload::Utf8)
            .map_err(|e| ProtocolError::InvalidInput(format!("payload is not UTF-8: {e}")))
    }
}

/// Registry of protocol codecs keyed by id.
pub struct ProtocolRegistry {
    codecs: Arc<RwLock<HashMap<u8, Box<dyn ProtocolCodec>>>>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ProtocolRegistry {
    /// An empty registry with no protocols enabled.
    pub fn new() -> Self {
        Self {
            codecs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A registry with the built-in UTF-8 text protocol at id 2.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        // Registration of a builtin into a fresh registry cannot fail.
        let _ = registry.register(PROTOCOL_UTF8_TEXT, Box::new(Utf8Text));
        registry
    }

    /// Register a codec for `protocol_id`, replacing any previous entry.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidInput` if the id does not fit the
    /// header's 6-bit field.
    pub fn register(&self, protocol_id: u8, codec: Box<dyn ProtocolCodec>) -> Result<()> {
        if protocol_id > MAX_PROTOCOL_ID {
            return Err(ProtocolError::InvalidInput(format!(
                "{}: {protocol_id}",
                constants::ERR_PROTOCOL_ID_RANGE
            )));
        }

        let mut codecs = self
            .codecs
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_WRITE_LOCK.to_string()))?;

        codecs.insert(protocol_id, codec);
        Ok(())
    }

    /// Render a payload under the codec registered for `protocol_id`.
    ///
    /// # Errors
    /// Returns `ProtocolError::UnsupportedProtocol` on lookup miss.
    pub fn render(&self, protocol_id: u8, payload: &Payload) -> Result<Vec<u8>> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_READ_LOCK.to_string()))?;

        codecs
            .get(&protocol_id)
            .ok_or(ProtocolError::UnsupportedProtocol(protocol_id))
            .and_then(|codec| codec.render(payload))
    }

    /// Interpret decrypted bytes under the codec registered for `protocol_id`.
    ///
    /// # Errors
    /// Returns `ProtocolError::UnsupportedProtocol` on lookup miss.
    pub fn interpret(&self, protocol_id: u8, bytes: &[u8]) -> Result<Payload> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_REGISTRY_READ_LOCK.to_string()))?;

        codecs
            .get(&protocol_id)
            .ok_or(ProtocolError::UnsupportedProtocol(protocol_id))
            .and_then(|codec| codec.interpret(bytes))
    }
}

impl Clone for ProtocolRegistry {
    fn clone(&self) -> Self {
        Self {
            codecs: Arc::clone(&self.codecs),
        }
    }
}
