//! # Core Codec Components
//!
//! Low-level building blocks for the glyph transport: the CJK carrier
//! alphabet, the byte/glyph codec, and fixed-length unit packing.
//!
//! ## Components
//! - **Alphabet**: bijection between `[0, 70304)` and three CJK blocks
//! - **Codec**: bytes <-> 16-bit integers <-> glyph strings
//! - **Unit**: header + ciphertext slot + padding <-> 140-glyph string
//!
//! ## Wire Format
//! ```text
//! [Header(8)] [Ciphertext slot(272)]  ->  140 ideographs
//! ```
//!
//! Everything here is pure: no I/O, no shared state, no locking.

pub mod alphabet;
pub mod codec;
pub mod unit;
