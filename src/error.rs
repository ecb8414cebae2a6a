//! # Error Types
//!
//! Comprehensive error handling for the carrier codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding message units, from bad local arguments to malformed fragment
//! sequences received from a transport.
//!
//! ## Error Categories
//! - **Input Errors**: out-of-domain integers, odd-length byte sequences,
//!   codepoints outside the carrier alphabet
//! - **Protocol Errors**: unknown protocol ids, inconsistent fragment sequences
//! - **Cryptographic Errors**: encryption/decryption failures (opaque)
//!
//! `InvalidInput` means the caller passed a bad local argument;
//! `ProtocolViolation` means a unit sequence arriving from the transport is
//! malformed. Callers that relay units should treat the two differently: the
//! first is a programming error, the second is corrupt or hostile traffic.
//!
//! All errors implement `std::error::Error` for interoperability.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Codec validation errors
    pub const ERR_ODD_LENGTH: &str = "byte sequence length must be even";
    pub const ERR_GLYPH_DOMAIN: &str = "glyph index outside alphabet domain";
    pub const ERR_NOT_A_GLYPH: &str = "codepoint outside the carrier alphabet";

    /// Unit packing errors
    pub const ERR_CHUNK_OVERFLOW: &str = "ciphertext chunk exceeds unit capacity";
    pub const ERR_UNIT_WIDTH: &str = "message unit must be exactly 140 codepoints";

    /// Header errors
    pub const ERR_PROTOCOL_ID_RANGE: &str = "protocol id must be below 64";
    pub const ERR_LENGTH_CLASS_RANGE: &str = "length class exceeds header capacity";
    pub const ERR_SYSTEM_TIME: &str = "system time error: time went backwards";

    /// Fragment sequence errors
    pub const ERR_EMPTY_SEQUENCE: &str = "fragment sequence is empty";
    pub const ERR_TERMINAL_FLAG: &str = "terminal unit carries the continuation flag";
    pub const ERR_INCONSISTENT_SEQUENCE: &str = "inconsistent fragment sequence";
    pub const ERR_SLOT_OVERFLOW: &str = "declared ciphertext length exceeds unit capacity";

    /// Registry errors
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on registry";
    pub const ERR_PAYLOAD_MISMATCH: &str = "payload variant does not match protocol";
}

// ProtocolError is the primary error type for all carrier operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported protocol id: {0}")]
    UnsupportedProtocol(u8),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Encryption failed")]
    EncryptionFailure,

    #[error("Decryption failed")]
    DecryptionFailure,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
