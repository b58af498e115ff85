//! Key material types: the one-time symmetric file key and RSA key handles.
//!
//! `FileKey` zeroizes on drop and never appears in `Debug` output. The RSA
//! handles wrap parsed keys so that envelope operations only ever see
//! structurally valid key material: a handle can only be obtained from the
//! generator or from a successful import.

use crate::codec;
use crate::error::CryptoResult;
use rsa::{RsaPrivateKey, RsaPublicKey};
use rsa::pkcs8::EncodePublicKey;
use rsa::traits::PublicKeyParts;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the symmetric file key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// RSA modulus size used for all key pairs.
pub const RSA_MODULUS_BITS: usize = 2048;

/// One-time AES-256-GCM key protecting a single file.
///
/// Generated fresh for every seal operation and never reused across files.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FileKey([u8; KEY_SIZE]);

impl FileKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileKey(REDACTED)")
    }
}

/// Parsed RSA public key, usable only to wrap file keys.
#[derive(Clone)]
pub struct PublicKeyHandle(RsaPublicKey);

impl PublicKeyHandle {
    pub(crate) fn new(key: RsaPublicKey) -> Self {
        Self(key)
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }

    /// RSA modulus size in bytes; equals the length of every wrapped key
    /// produced under this public key (256 for 2048-bit keys).
    pub fn modulus_size(&self) -> usize {
        self.0.size()
    }

    /// Short identifier for displaying or indexing stored keys:
    /// the first 8 bytes of the SHA-256 of the SPKI export, hex-encoded.
    pub fn fingerprint(&self) -> CryptoResult<String> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| crate::error::CryptoError::InvalidPublicKey(e.to_string()))?;
        let digest = Sha256::digest(der.as_bytes());
        Ok(codec::encode_hex(&digest[..8]))
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyHandle")
            .field("modulus_bits", &(self.0.size() * 8))
            .finish()
    }
}

/// Parsed RSA private key, usable only to unwrap file keys.
///
/// Deliberately not `Clone`: the caller owns exactly one handle per import
/// and decides how long it lives.
pub struct PrivateKeyHandle(RsaPrivateKey);

impl PrivateKeyHandle {
    pub(crate) fn new(key: RsaPrivateKey) -> Self {
        Self(key)
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }

    /// Derives the matching public key handle.
    pub fn public_key(&self) -> PublicKeyHandle {
        PublicKeyHandle(self.0.to_public_key())
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeyHandle(REDACTED)")
    }
}

/// Freshly generated RSA key pair (2048-bit modulus, e = 65537, OAEP/SHA-256).
#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKeyHandle,
    pub private: PrivateKeyHandle,
}

impl KeyPair {
    /// Exports both keys for textual transport: SPKI for the public key,
    /// PKCS#8 for the private key, each hex-encoded.
    pub fn to_hex(&self) -> CryptoResult<KeyPairHex> {
        Ok(KeyPairHex {
            public_key: codec::export_public_key(&self.public)?,
            private_key: codec::export_private_key(&self.private)?,
        })
    }
}

/// Hex-encoded key pair export for clipboard, form fields, or display.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyPairHex {
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("public_key", &self.public_key)
            .field("private_key", &"REDACTED")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_key_round_trips_bytes() {
        let key = FileKey::from_bytes([7u8; KEY_SIZE]);
        assert_eq!(key.as_bytes(), &[7u8; KEY_SIZE]);
    }

    #[test]
    fn file_key_debug_does_not_leak_bytes() {
        let key = FileKey::from_bytes([0xAB; KEY_SIZE]);
        let debug_str = format!("{key:?}");
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("ab"));
    }
}
