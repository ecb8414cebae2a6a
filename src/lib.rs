//! # glyphwire
//!
//! Covert transport codec for character-counted channels.
//!
//! Turns an arbitrary byte payload into one or more fixed-length strings of
//! CJK ideographs (140 codepoints each) so the payload survives transport
//! through channels that cap length in characters, not bytes. Content is
//! symmetrically encrypted; each unit is prefixed with an obfuscated header
//! carrying the payload length class, a protocol id, and a fragment flag.
//!
//! ## Components
//! - **core**: carrier alphabet, byte/glyph codec, unit packing
//! - **protocol**: obfuscated headers, protocol registry, payload carrier
//! - **utils**: cipher capability traits and default implementations
//! - **config**: wire geometry constants and key material
//!
//! ## Example
//! ```
//! use glyphwire::{Carrier, Payload, PROTOCOL_UTF8_TEXT};
//!
//! let mut carrier = Carrier::with_defaults();
//! let units = carrier
//!     .encode(PROTOCOL_UTF8_TEXT, &Payload::Utf8("hello".into()))
//!     .expect("encode");
//!
//! assert_eq!(units[0].chars().count(), 140);
//!
//! let (protocol_id, payload) = carrier.decode(&units).expect("decode");
//! assert_eq!(protocol_id, PROTOCOL_UTF8_TEXT);
//! assert_eq!(payload, Payload::Utf8("hello".into()));
//! ```
//!
//! ## Security
//! - Content confidentiality only: there is no integrity tag, and the header
//!   obfuscation key is a protocol constant. Authenticate at a higher layer
//!   if tampering matters.
//! - The fragment sequence must be delivered in order; the terminal unit is
//!   positional.

#![forbid(unsafe_code)]
#![warn(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use config::{CarrierConfig, PROTOCOL_UTF8_TEXT, UNIT_GLYPHS};
pub use error::{ProtocolError, Result};
pub use protocol::carrier::Carrier;
pub use protocol::registry::{Payload, ProtocolCodec, ProtocolRegistry};
