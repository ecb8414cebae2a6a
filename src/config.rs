//! # Configuration Management
//!
//! Protocol constants and key material configuration for the carrier.
//!
//! The wire geometry (unit width, header size, ciphertext slot) is fixed by
//! the protocol and exposed as constants. Key material is configurable: the
//! payload key is a deployment secret, while the header-obfuscation key is a
//! protocol-wide constant that both ends share implicitly (it hides header
//! bit fields from casual inspection, nothing more).
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//!
//! ## Security Considerations
//! - The default payload key is well-known; override it anywhere secrecy
//!   matters. `validate()` flags the default.
//! - Header obfuscation is not encryption in any meaningful sense: the key is
//!   public and there is no integrity tag.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Obfuscated header length in bytes.
pub const HEADER_BYTES: usize = 8;

/// Ciphertext slot length per unit in bytes.
pub const CHUNK_BYTES: usize = 272;

/// Total unit length in bytes: header plus ciphertext slot.
pub const UNIT_BYTES: usize = HEADER_BYTES + CHUNK_BYTES;

/// Rendered unit width in codepoints (two bytes per glyph).
pub const UNIT_GLYPHS: usize = UNIT_BYTES / 2;

/// Payload cipher block length in bytes.
pub const CIPHER_BLOCK_BYTES: usize = 16;

/// Highest protocol id representable in the header (6 bits).
pub const MAX_PROTOCOL_ID: u8 = 63;

/// Protocol id for UTF-8 text payloads.
pub const PROTOCOL_UTF8_TEXT: u8 = 2;

/// Protocol-wide header obfuscation key. Shared by every conforming
/// implementation; changing it forks the wire format.
pub const HEADER_OBFUSCATION_KEY: [u8; 8] = [0x9E, 0x3C, 0x51, 0xA7, 0x08, 0xD4, 0x6B, 0xF2];

/// Well-known default payload key, for interop tests and demos only.
pub const DEFAULT_PAYLOAD_KEY: [u8; 16] = [
    0x42, 0x17, 0xE9, 0x0B, 0x5D, 0xC8, 0x33, 0x7A, 0xF1, 0x60, 0x9C, 0x2E, 0x85, 0xDB, 0x4F, 0x16,
];

/// Key material for one carrier instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CarrierConfig {
    /// Symmetric key for the payload cipher (deployment secret)
    #[serde(default = "default_payload_key")]
    pub payload_key: [u8; 16],

    /// Key for the 8-byte header block cipher (protocol constant unless both
    /// ends agree otherwise)
    #[serde(default = "default_header_key")]
    pub header_key: [u8; 8],
}

fn default_payload_key() -> [u8; 16] {
    DEFAULT_PAYLOAD_KEY
}

fn default_header_key() -> [u8; 8] {
    HEADER_OBFUSCATION_KEY
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            payload_key: DEFAULT_PAYLOAD_KEY,
            header_key: HEADER_OBFUSCATION_KEY,
        }
    }
}

impl CarrierConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.payload_key.iter().all(|&b| b == 0) {
            errors.push("Payload key must not be all zeroes".to_string());
        }

        if self.header_key.iter().all(|&b| b == 0) {
            errors.push("Header key must not be all zeroes".to_string());
        }

        if self.payload_key == DEFAULT_PAYLOAD_KEY {
            errors.push(
                "WARNING: payload key is the well-known default - not recommended for production"
                    .to_string(),
            );
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
