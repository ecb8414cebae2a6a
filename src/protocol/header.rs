//! # Obfuscated Unit Headers
//!
//! Each unit starts with a 64-bit header, serialized big-endian and passed
//! through the 8-byte header cipher so its bit fields are not visible to a
//! casual observer of the glyph stream.
//!
//! Bit layout (bit 0 = least significant):
//!
//! ```text
//! [0,52)  filler    wall-clock derived for genuine headers, random for
//!                   dummies; never interpreted on decode
//! [52,58) protocol  id, 0-63
//! [58,63) blocks    n, 0-31; the ciphertext slot consumed is n*16 bytes
//! 63      flag      1 = more fragments follow (dummy header, no real length)
//!                   0 = terminal, authoritative header
//! ```
//!
//! The block count is always `len/16 + 1` because the payload cipher appends
//! at least one full padding block.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use crate::config::{CIPHER_BLOCK_BYTES, HEADER_BYTES, MAX_PROTOCOL_ID};
use crate::error::{constants, ProtocolError, Result};
use crate::utils::crypto::HeaderCipher;

const FILLER_MASK: u64 = (1 << 52) - 1;
const PROTOCOL_SHIFT: u32 = 52;
const PROTOCOL_MASK: u64 = 0x3F;
const BLOCKS_SHIFT: u32 = 58;
const BLOCKS_MASK: u64 = 0x1F;
const FLAG_SHIFT: u32 = 63;

/// Fields recovered from a decoded header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    /// Ciphertext length consumed from the unit's slot, in bytes (n*16).
    pub slot_len: usize,
    /// Protocol id, 0-63.
    pub protocol_id: u8,
    /// True for continuation units; false for the terminal unit.
    pub more_fragments: bool,
}

/// Encoder/decoder for obfuscated headers, parameterized over the header
/// cipher capability.
#[derive(Debug, Clone)]
pub struct HeaderCodec<H> {
    cipher: H,
}

impl<H: HeaderCipher> HeaderCodec<H> {
    pub fn new(cipher: H) -> Self {
        Self { cipher }
    }

    /// Encode a genuine header for a chunk of `chunk_len` plaintext bytes.
    ///
    /// The filler is derived from the wall clock so repeated encodings of the
    /// same chunk produce distinct headers (and therefore distinct IVs).
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidInput` if `protocol_id` exceeds 63 or
    /// the length class does not fit in five bits.
    pub fn encode(
        &self,
        chunk_len: usize,
        protocol_id: u8,
        more_fragments: bool,
    ) -> Result<[u8; HEADER_BYTES]> {
        let blocks = (chunk_len / CIPHER_BLOCK_BYTES + 1) as u64;
        if blocks > BLOCKS_MASK {
            return Err(ProtocolError::InvalidInput(format!(
                "{}: {chunk_len} bytes",
                constants::ERR_LENGTH_CLASS_RANGE
            )));
        }

        self.assemble(clock_filler()?, blocks, protocol_id, more_fragments)
    }

    /// Encode a dummy header for a continuation unit. The filler is random
    /// and the fragment flag is forced on; protocol id and length class carry
    /// no meaning.
    pub fn encode_dummy<R: RngCore>(&self, rng: &mut R) -> Result<[u8; HEADER_BYTES]> {
        self.assemble(rng.next_u64() & FILLER_MASK, 0, 0, true)
    }

    /// Deobfuscate and unpack a header. Filler is discarded unvalidated.
    pub fn decode(&self, bytes: &[u8; HEADER_BYTES]) -> Result<HeaderFields> {
        let value = u64::from_be_bytes(self.cipher.decrypt_block(*bytes));

        let blocks = (value >> BLOCKS_SHIFT) & BLOCKS_MASK;
        Ok(HeaderFields {
            slot_len: blocks as usize * CIPHER_BLOCK_BYTES,
            protocol_id: ((value >> PROTOCOL_SHIFT) & PROTOCOL_MASK) as u8,
            more_fragments: (value >> FLAG_SHIFT) & 1 == 1,
        })
    }

    fn assemble(
        &self,
        filler: u64,
        blocks: u64,
        protocol_id: u8,
        more_fragments: bool,
    ) -> Result<[u8; HEADER_BYTES]> {
        if protocol_id > MAX_PROTOCOL_ID {
            return Err(ProtocolError::InvalidInput(format!(
                "{}: {protocol_id}",
                constants::ERR_PROTOCOL_ID_RANGE
            )));
        }

        let value = (filler & FILLER_MASK)
            | (u64::from(protocol_id) << PROTOCOL_SHIFT)
            | (blocks << BLOCKS_SHIFT)
            | (u64::from(more_fragments) << FLAG_SHIFT);

        Ok(self.cipher.encrypt_block(value.to_be_bytes()))
    }
}

/// Current wall clock reduced to the 52-bit filler field.
///
/// # Errors
/// Returns a `ProtocolError::Custom` if the system time is earlier than UNIX_EPOCH
fn clock_filler() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos() as u64 & FILLER_MASK)
        .map_err(|_| ProtocolError::Custom(constants::ERR_SYSTEM_TIME.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HEADER_OBFUSCATION_KEY;
    use crate::utils::crypto::DesBlock;
    use rand::rngs::mock::StepRng;

    fn codec() -> HeaderCodec<DesBlock> {
        HeaderCodec::new(DesBlock::new(HEADER_OBFUSCATION_KEY))
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn encode_decode_round_trip() {
        let codec = codec();

        for (chunk_len, protocol_id, flag) in
            [(0usize, 0u8, false), (1, 2, false), (271, 63, true), (160, 17, true)]
        {
            let header = codec.encode(chunk_len, protocol_id, flag).unwrap();
            let fields = codec.decode(&header).unwrap();

            assert_eq!(fields.slot_len, (chunk_len / 16 + 1) * 16);
            assert_eq!(fields.protocol_id, protocol_id);
            assert_eq!(fields.more_fragments, flag);
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn length_class_boundaries() {
        let codec = codec();

        let fields = codec.decode(&codec.encode(0, 2, false).unwrap()).unwrap();
        assert_eq!(fields.slot_len, 16);

        let fields = codec.decode(&codec.encode(15, 2, false).unwrap()).unwrap();
        assert_eq!(fields.slot_len, 16);

        let fields = codec.decode(&codec.encode(16, 2, false).unwrap()).unwrap();
        assert_eq!(fields.slot_len, 32);

        let fields = codec.decode(&codec.encode(271, 2, false).unwrap()).unwrap();
        assert_eq!(fields.slot_len, 272);
    }

    #[test]
    fn oversized_length_class_rejected() {
        // 31 blocks is the ceiling; 496 bytes would need 32
        assert!(codec().encode(496, 2, false).is_err());
    }

    #[test]
    fn protocol_id_range_enforced() {
        assert!(codec().encode(10, 64, false).is_err());
        assert!(codec().encode(10, u8::MAX, false).is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn dummy_headers_carry_the_flag() {
        let codec = codec();
        let mut rng = StepRng::new(0xDEAD_BEEF, 0x9E37_79B9);

        let fields = codec.decode(&codec.encode_dummy(&mut rng).unwrap()).unwrap();
        assert!(fields.more_fragments);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn headers_are_obfuscated() {
        // The packed value must not appear on the wire verbatim.
        let codec = codec();
        let value = 0x1234_5678_9ABC_u64
            | (2u64 << PROTOCOL_SHIFT)
            | (7u64 << BLOCKS_SHIFT);
        let header = codec.assemble(value & FILLER_MASK, 7, 2, false).unwrap();

        assert_ne!(header, value.to_be_bytes());
        assert_eq!(
            codec.decode(&header).unwrap(),
            HeaderFields {
                slot_len: 112,
                protocol_id: 2,
                more_fragments: false
            }
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn successive_headers_differ() {
        // Clock filler makes repeated encodings distinct.
        let codec = codec();
        let a = codec.encode(100, 2, false).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = codec.encode(100, 2, false).unwrap();
        assert_ne!(a, b);
    }
}
