//! Hex codec and asymmetric key import/export.
//!
//! Keys travel as hex text (clipboard, form fields); underneath the hex is
//! standard DER: SPKI for public keys, PKCS#8 for private keys. All
//! functions are pure transformations with no side effects.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{PrivateKeyHandle, PublicKeyHandle};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Encodes bytes as lowercase hex, two characters per byte, no separators.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string. Accepts mixed case; rejects odd-length input and
/// non-hex characters with [`CryptoError::Format`].
pub fn decode_hex(input: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(input).map_err(|e| CryptoError::Format(e.to_string()))
}

/// Imports a hex-encoded SPKI public key as an RSA-OAEP wrapping key.
pub fn import_public_key(hex_key: &str) -> CryptoResult<PublicKeyHandle> {
    let der = decode_hex(hex_key).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    let key = RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    Ok(PublicKeyHandle::new(key))
}

/// Imports a hex-encoded PKCS#8 private key as an RSA-OAEP unwrapping key.
pub fn import_private_key(hex_key: &str) -> CryptoResult<PrivateKeyHandle> {
    let der = decode_hex(hex_key).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
    let key = RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
    Ok(PrivateKeyHandle::new(key))
}

/// Exports a public key as hex-encoded SPKI DER.
pub fn export_public_key(key: &PublicKeyHandle) -> CryptoResult<String> {
    let der = key
        .as_rsa()
        .to_public_key_der()
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    Ok(encode_hex(der.as_bytes()))
}

/// Exports a private key as hex-encoded PKCS#8 DER.
pub fn export_private_key(key: &PrivateKeyHandle) -> CryptoResult<String> {
    let der = key
        .as_rsa()
        .to_pkcs8_der()
        .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
    Ok(encode_hex(der.as_bytes()))
}
