//! # Payload Carrier
//!
//! Top-level encode/decode between payload values and sequences of
//! fixed-length glyph units. A payload that fits one unit's 272-byte
//! ciphertext slot travels as a single terminal unit; anything larger is
//! split across continuation units under dummy headers, with the terminal
//! unit last.
//!
//! The whole payload is encrypted in one continuous CBC pass whose IV is
//! derived from the terminal header, so cipher chaining spans unit
//! boundaries and continuation units are undecipherable in isolation.
//!
//! Unit order is load-bearing: `encode` emits chunks in payload order, and
//! `decode` treats the *last* supplied unit as terminal rather than scanning
//! for the flag. Delivering units in order is the transport's job.
//!
//! All capabilities (payload cipher, header cipher, RNG, registry) are
//! explicit dependencies, so deterministic tests can substitute fixed
//! implementations.

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, trace};

use crate::config::{CarrierConfig, CHUNK_BYTES, HEADER_BYTES};
use crate::core::unit;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::header::HeaderCodec;
use crate::protocol::registry::{Payload, ProtocolRegistry};
use crate::utils::crypto::{AesCbc, DesBlock, HeaderCipher, PayloadCipher};

/// Carrier assembled from explicit capabilities.
pub struct Carrier<P, H, R> {
    cipher: P,
    headers: HeaderCodec<H>,
    rng: R,
    registry: ProtocolRegistry,
}

impl Carrier<AesCbc, DesBlock, OsRng> {
    /// Carrier over AES-128-CBC and DES with the OS random source and the
    /// built-in protocol set.
    pub fn from_config(config: &CarrierConfig) -> Self {
        Self::new(
            AesCbc::new(config.payload_key),
            DesBlock::new(config.header_key),
            OsRng,
            ProtocolRegistry::with_builtin(),
        )
    }

    /// Carrier with the well-known default keys. Interop tests and demos
    /// only; real deployments supply their own `CarrierConfig`.
    pub fn with_defaults() -> Self {
        Self::from_config(&CarrierConfig::default())
    }
}

impl<P, H, R> Carrier<P, H, R>
where
    P: PayloadCipher,
    H: HeaderCipher,
    R: RngCore,
{
    pub fn new(cipher: P, header_cipher: H, rng: R, registry: ProtocolRegistry) -> Self {
        Self {
            cipher,
            headers: HeaderCodec::new(header_cipher),
            rng,
            registry,
        }
    }

    /// The registry this carrier resolves protocol ids against.
    pub fn registry(&self) -> &ProtocolRegistry {
        &self.registry
    }

    /// Encode a payload into an ordered sequence of 140-glyph unit strings.
    ///
    /// # Errors
    /// - `ProtocolError::UnsupportedProtocol` if `protocol_id` is not
    ///   registered
    /// - `ProtocolError::EncryptionFailure` if the payload cipher fails
    pub fn encode(&mut self, protocol_id: u8, payload: &Payload) -> Result<Vec<String>> {
        let rendered = self.registry.render(protocol_id, payload)?;

        // The terminal header describes the final chunk only. Taking the
        // length modulo the slot size also covers the single-unit case, and
        // an exact multiple leaves the terminal unit carrying just the
        // cipher's padding block (length class 0 -> one block).
        let tail_len = rendered.len() % CHUNK_BYTES;
        let terminal = self.headers.encode(tail_len, protocol_id, false)?;

        let iv = chain_iv(&terminal);
        let ciphertext = self.cipher.encrypt(&iv, &rendered)?;
        debug_assert_eq!(ciphertext.len() % 16, 0);

        let chunks: Vec<&[u8]> = ciphertext.chunks(CHUNK_BYTES).collect();
        debug!(
            rendered_len = rendered.len(),
            units = chunks.len(),
            protocol_id,
            "encoding payload"
        );

        let mut units = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let is_terminal = index + 1 == chunks.len();
            let header = if is_terminal {
                terminal
            } else {
                self.headers.encode_dummy(&mut self.rng)?
            };

            trace!(index, chunk_len = chunk.len(), is_terminal, "packing unit");
            units.push(unit::pack(&header, chunk, &mut self.rng)?);
        }

        Ok(units)
    }

    /// Decode an ordered sequence of unit strings back into its payload.
    ///
    /// # Errors
    /// - `ProtocolError::ProtocolViolation` if the sequence is empty, the
    ///   terminal unit carries the continuation flag, any earlier unit does
    ///   not, or the declared ciphertext length overflows the slot
    /// - `ProtocolError::InvalidInput` if any string is not a well-formed
    ///   unit
    /// - `ProtocolError::UnsupportedProtocol` / `DecryptionFailure` as the
    ///   registry and cipher surface them
    pub fn decode<S: AsRef<str>>(&self, units: &[S]) -> Result<(u8, Payload)> {
        let (terminal_unit, leading) = units.split_last().ok_or_else(|| {
            ProtocolError::ProtocolViolation(constants::ERR_EMPTY_SEQUENCE.to_string())
        })?;

        let (terminal_header, terminal_slot) = unit::unpack(terminal_unit.as_ref())?;
        let fields = self.headers.decode(&terminal_header)?;

        if fields.more_fragments {
            return Err(ProtocolError::ProtocolViolation(
                constants::ERR_TERMINAL_FLAG.to_string(),
            ));
        }
        if fields.slot_len > CHUNK_BYTES {
            return Err(ProtocolError::ProtocolViolation(
                constants::ERR_SLOT_OVERFLOW.to_string(),
            ));
        }

        debug!(
            units = units.len(),
            protocol_id = fields.protocol_id,
            terminal_len = fields.slot_len,
            "decoding fragment sequence"
        );

        let mut ciphertext = Vec::with_capacity(leading.len() * CHUNK_BYTES + fields.slot_len);
        for continuation in leading {
            let (header, slot) = unit::unpack(continuation.as_ref())?;
            if !self.headers.decode(&header)?.more_fragments {
                return Err(ProtocolError::ProtocolViolation(
                    constants::ERR_INCONSISTENT_SEQUENCE.to_string(),
                ));
            }
            ciphertext.extend_from_slice(&slot);
        }
        ciphertext.extend_from_slice(&terminal_slot[..fields.slot_len]);

        let iv = chain_iv(&terminal_header);
        let rendered = self.cipher.decrypt(&iv, &ciphertext)?;

        let payload = self.registry.interpret(fields.protocol_id, &rendered)?;
        Ok((fields.protocol_id, payload))
    }
}

/// IV for the payload cipher: the obfuscated terminal header repeated to one
/// cipher block. Both ends hold the header bytes, so no extra IV travels on
/// the wire.
fn chain_iv(header: &[u8; HEADER_BYTES]) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..HEADER_BYTES].copy_from_slice(header);
    iv[HEADER_BYTES..].copy_from_slice(header);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_iv_doubles_the_header() {
        let header = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            chain_iv(&header),
            [1, 2, 3, 4, 5, 6, 7, 8, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }
}
