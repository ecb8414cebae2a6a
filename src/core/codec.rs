//! # Byte/Glyph Codec
//!
//! Converts raw bytes to 16-bit integers and integers to ideograph strings,
//! composing with the [`alphabet`](crate::core::alphabet) bijection. The two
//! composed directions, [`bytes_to_string`] and [`string_to_bytes`], are exact
//! inverses for any even-length byte sequence.
//!
//! All functions here are pure and allocation-bounded; they are safe to call
//! concurrently without synchronization.

use crate::core::alphabet;
use crate::error::{constants, ProtocolError, Result};

/// Group an even-length byte sequence into little-endian 16-bit integers.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` for odd-length input.
pub fn bytes_to_ints(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(ProtocolError::InvalidInput(format!(
            "{}: {}",
            constants::ERR_ODD_LENGTH,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Flatten 16-bit integers back into bytes, low byte first.
pub fn ints_to_bytes(ints: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(ints.len() * 2);
    for n in ints {
        bytes.extend_from_slice(&n.to_le_bytes());
    }
    bytes
}

/// Render integers as a string of carrier glyphs, preserving order.
///
/// # Errors
/// Cannot fail for `u16` input today (the alphabet domain exceeds 65535), but
/// the fallible signature is kept so the alphabet can shrink without an API
/// break.
pub fn ints_to_string(ints: &[u16]) -> Result<String> {
    let mut out = String::with_capacity(ints.len() * 4);
    for &n in ints {
        out.push(alphabet::codepoint_for(u32::from(n))?);
    }
    Ok(out)
}

/// Walk a glyph string one codepoint at a time and recover the integers.
///
/// Iteration is by `char`, so multi-unit UTF-8/UTF-16 encodings of a single
/// codepoint are consumed atomically.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` if any codepoint falls outside the
/// carrier alphabet or maps above the 16-bit integer domain.
pub fn string_to_ints(s: &str) -> Result<Vec<u16>> {
    s.chars()
        .map(|glyph| {
            let index = alphabet::index_of(glyph)?;
            u16::try_from(index).map_err(|_| {
                ProtocolError::InvalidInput(format!(
                    "{}: U+{:04X}",
                    constants::ERR_GLYPH_DOMAIN,
                    glyph as u32
                ))
            })
        })
        .collect()
}

/// Render an even-length byte sequence as carrier glyphs.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` for odd-length input.
pub fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    ints_to_string(&bytes_to_ints(bytes)?)
}

/// Recover the byte sequence behind a glyph string.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` if the string contains codepoints
/// outside the carrier alphabet.
pub fn string_to_bytes(s: &str) -> Result<Vec<u8>> {
    Ok(ints_to_bytes(&string_to_ints(s)?))
}
