//! # Cipher Capabilities
//!
//! The carrier consumes two cipher shapes, expressed as traits so callers can
//! substitute deterministic fakes in tests:
//!
//! - [`PayloadCipher`]: a chained block cipher with deterministic padding over
//!   the whole payload. The padding MUST append exactly one full block when
//!   the plaintext length is a multiple of the block size; the header's
//!   length class (`n = len/16 + 1`) relies on it.
//! - [`HeaderCipher`]: a single 8-byte block permutation, unchained and
//!   unpadded, used purely to obfuscate header bit fields.
//!
//! The default implementations are AES-128-CBC with PKCS#7 padding and
//! single-block DES. PKCS#7 satisfies the full-block guarantee above.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use des::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use des::Des;

use crate::config::HEADER_BYTES;
use crate::error::{ProtocolError, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Chained payload cipher with deterministic padding.
pub trait PayloadCipher {
    /// Encrypt `plaintext` under the given 16-byte IV.
    ///
    /// # Errors
    /// Returns `ProtocolError::EncryptionFailure` on cipher failure.
    fn encrypt(&self, iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` under the given 16-byte IV and strip padding.
    ///
    /// # Errors
    /// Returns `ProtocolError::DecryptionFailure` on cipher or padding
    /// failure.
    fn decrypt(&self, iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Unchained single-block cipher over the 8-byte header.
pub trait HeaderCipher {
    /// Obfuscate one header block.
    fn encrypt_block(&self, block: [u8; HEADER_BYTES]) -> [u8; HEADER_BYTES];

    /// Recover one header block.
    fn decrypt_block(&self, block: [u8; HEADER_BYTES]) -> [u8; HEADER_BYTES];
}

/// AES-128-CBC with PKCS#7 padding.
#[derive(Clone)]
pub struct AesCbc {
    key: [u8; 16],
}

impl AesCbc {
    pub fn new(key: [u8; 16]) -> Self {
        Self { key }
    }
}

impl std::fmt::Debug for AesCbc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesCbc([REDACTED])")
    }
}

impl PayloadCipher for AesCbc {
    fn encrypt(&self, iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>> {
        let enc = Aes128CbcEnc::new(&self.key.into(), iv.into());
        Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn decrypt(&self, iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let dec = Aes128CbcDec::new(&self.key.into(), iv.into());
        dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| ProtocolError::DecryptionFailure)
    }
}

/// Single-block DES, for header obfuscation only. DES is cryptographically
/// weak; the header hides bit fields from casual inspection, nothing more.
#[derive(Clone)]
pub struct DesBlock {
    cipher: Des,
}

impl DesBlock {
    pub fn new(key: [u8; HEADER_BYTES]) -> Self {
        Self {
            cipher: Des::new(GenericArray::from_slice(&key)),
        }
    }
}

impl std::fmt::Debug for DesBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DesBlock([REDACTED])")
    }
}

impl HeaderCipher for DesBlock {
    fn encrypt_block(&self, block: [u8; HEADER_BYTES]) -> [u8; HEADER_BYTES] {
        let mut data = GenericArray::clone_from_slice(&block);
        self.cipher.encrypt_block(&mut data);
        data.into()
    }

    fn decrypt_block(&self, block: [u8; HEADER_BYTES]) -> [u8; HEADER_BYTES] {
        let mut data = GenericArray::clone_from_slice(&block);
        self.cipher.decrypt_block(&mut data);
        data.into()
    }
}
