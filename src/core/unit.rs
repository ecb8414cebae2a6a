//! # Message Unit Packing
//!
//! A message unit is the fixed-length transport item: 8 header bytes, a
//! 272-byte ciphertext slot, rendered as exactly 140 glyphs. Any unused tail
//! of the slot is filled with random bytes so every unit is indistinguishable
//! in shape regardless of how much ciphertext it carries.

use bytes::{BufMut, BytesMut};
use rand::RngCore;

use crate::config::{CHUNK_BYTES, HEADER_BYTES, UNIT_BYTES, UNIT_GLYPHS};
use crate::core::codec;
use crate::error::{constants, ProtocolError, Result};

/// Assemble one unit string from an obfuscated header and a ciphertext chunk.
///
/// The chunk may be shorter than the slot; the remainder is padded with
/// random bytes that carry no meaning and are never parsed.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` if the chunk exceeds the slot.
pub fn pack<R: RngCore>(
    header: &[u8; HEADER_BYTES],
    chunk: &[u8],
    rng: &mut R,
) -> Result<String> {
    if chunk.len() > CHUNK_BYTES {
        return Err(ProtocolError::InvalidInput(format!(
            "{}: {} > {CHUNK_BYTES}",
            constants::ERR_CHUNK_OVERFLOW,
            chunk.len()
        )));
    }

    let mut buf = BytesMut::with_capacity(UNIT_BYTES);
    buf.put_slice(header);
    buf.put_slice(chunk);

    let mut padding = vec![0u8; CHUNK_BYTES - chunk.len()];
    rng.fill_bytes(&mut padding);
    buf.put_slice(&padding);

    codec::bytes_to_string(&buf)
}

/// Split a unit string back into its header and full 272-byte slot.
///
/// The slot still contains trailing padding; the caller truncates it using
/// the length recovered from the decoded header.
///
/// # Errors
/// Returns `ProtocolError::InvalidInput` if the string is not exactly
/// [`UNIT_GLYPHS`] codepoints or contains foreign glyphs.
pub fn unpack(unit: &str) -> Result<([u8; HEADER_BYTES], Vec<u8>)> {
    if unit.chars().count() != UNIT_GLYPHS {
        return Err(ProtocolError::InvalidInput(format!(
            "{}, got {}",
            constants::ERR_UNIT_WIDTH,
            unit.chars().count()
        )));
    }

    let bytes = codec::string_to_bytes(unit)?;
    debug_assert_eq!(bytes.len(), UNIT_BYTES);

    let mut header = [0u8; HEADER_BYTES];
    header.copy_from_slice(&bytes[..HEADER_BYTES]);
    Ok((header, bytes[HEADER_BYTES..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn pack_renders_fixed_width() {
        let mut rng = StepRng::new(0, 1);
        let header = [0xAA; HEADER_BYTES];

        for chunk_len in [0usize, 1, 16, 271, 272] {
            let chunk = vec![0x5C; chunk_len];
            let unit = pack(&header, &chunk, &mut rng).unwrap();
            assert_eq!(unit.chars().count(), UNIT_GLYPHS);
        }
    }

    #[test]
    fn pack_rejects_oversized_chunk() {
        let mut rng = StepRng::new(0, 1);
        let chunk = vec![0u8; CHUNK_BYTES + 1];
        assert!(matches!(
            pack(&[0u8; HEADER_BYTES], &chunk, &mut rng),
            Err(ProtocolError::InvalidInput(_))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn pack_unpack_round_trip() {
        let mut rng = StepRng::new(0x1234_5678, 0x9E37_79B9);
        let header = [7u8; HEADER_BYTES];
        let chunk: Vec<u8> = (0..100u8).collect();

        let unit = pack(&header, &chunk, &mut rng).unwrap();
        let (recovered_header, slot) = unpack(&unit).unwrap();

        assert_eq!(recovered_header, header);
        assert_eq!(slot.len(), CHUNK_BYTES);
        assert_eq!(&slot[..chunk.len()], chunk.as_slice());
    }

    #[test]
    fn unpack_rejects_wrong_width() {
        assert!(unpack("").is_err());
        assert!(unpack("\u{4E00}").is_err());
        let long: String = "\u{4E00}".repeat(UNIT_GLYPHS + 1);
        assert!(unpack(&long).is_err());
    }

    #[test]
    fn unpack_rejects_foreign_glyphs() {
        let mostly_valid: String = "\u{4E00}".repeat(UNIT_GLYPHS - 1) + "x";
        assert!(unpack(&mostly_valid).is_err());
    }
}
