//! Hybrid file-encryption envelope.
//!
//! Sealing combines three primitives into one deterministic protocol: a fresh
//! AES-256-GCM key encrypts the file content, the recipient's RSA-OAEP public
//! key wraps that one-time key, and a SHA-256 digest of the plaintext rides
//! *inside* the authenticated payload as defense-in-depth. The server that
//! stores the results never sees plaintext or keys.
//!
//! # Byte layout
//! ```text
//! envelope    = [ nonce (12 bytes) ][ AES-256-GCM(digest ‖ plaintext) + tag (16 bytes) ]
//! wrapped key = RSA-OAEP(SHA-256) ciphertext of the raw 32-byte file key
//! ```
//!
//! The nonce prefixes the envelope so the opener can locate it without
//! parsing ciphertext. The digest lives inside the sealed payload so it
//! cannot be substituted independently of the ciphertext.

use crate::codec;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{FileKey, PrivateKeyHandle, PublicKeyHandle, KEY_SIZE};
use crate::progress::Progress;
use crate::provider::CryptoProvider;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;
use zeroize::Zeroize;

/// AES-GCM nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// SHA-256 digest size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Smallest well-formed envelope: a nonce plus the tag of an empty payload.
pub const MIN_ENVELOPE_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Number of progress steps in a seal operation.
pub const SEAL_STEPS: u32 = 5;

/// Number of progress steps in an open operation.
pub const OPEN_STEPS: u32 = 3;

/// Stored/transmitted ciphertext blob for one file: nonce followed by
/// authenticated ciphertext.
///
/// Can only be produced by [`seal_file`] or by [`FileEnvelope::from_bytes`]
/// validation, so a value of this type always carries its nonce in the fixed
/// 12-byte prefix; there is no way to construct one that misplaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEnvelope(Vec<u8>);

impl FileEnvelope {
    /// Validates raw envelope bytes retrieved from storage.
    ///
    /// Anything shorter than nonce + tag cannot have been produced by a seal
    /// operation and is classified as corrupted ciphertext.
    pub fn from_bytes(bytes: Vec<u8>) -> CryptoResult<Self> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(CryptoError::ContentDecryption);
        }
        Ok(Self(bytes))
    }

    pub(crate) fn assemble(nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        bytes.extend_from_slice(nonce);
        bytes.extend_from_slice(ciphertext);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn nonce(&self) -> [u8; NONCE_SIZE] {
        // invariant: len >= MIN_ENVELOPE_SIZE > NONCE_SIZE
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&self.0[..NONCE_SIZE]);
        nonce
    }

    pub(crate) fn ciphertext(&self) -> &[u8] {
        &self.0[NONCE_SIZE..]
    }
}

impl Serialize for FileEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FileEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        FileEnvelope::from_bytes(bytes).map_err(D::Error::custom)
    }
}

/// The file's one-time key, encrypted under the recipient's public key.
/// Length equals the RSA modulus size (256 bytes for 2048-bit keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey(Vec<u8>);

impl WrappedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for WrappedKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Result of sealing one file: the envelope to store and the wrapped key
/// paired 1:1 with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedFile {
    pub envelope: FileEnvelope,
    pub wrapped_key: WrappedKey,
}

impl SealedFile {
    /// Encodes both blobs as a single base64 string for transports that want
    /// one opaque value: a big-endian u16 length prefix, the wrapped key,
    /// then the envelope.
    pub fn to_base64(&self) -> String {
        let wrapped = self.wrapped_key.as_bytes();
        let envelope = self.envelope.as_bytes();
        let mut buf = Vec::with_capacity(2 + wrapped.len() + envelope.len());
        buf.extend_from_slice(&(wrapped.len() as u16).to_be_bytes());
        buf.extend_from_slice(wrapped);
        buf.extend_from_slice(envelope);
        BASE64.encode(buf)
    }

    /// Decodes the single-blob form produced by [`SealedFile::to_base64`].
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::Format(format!("invalid base64: {e}")))?;
        if bytes.len() < 2 {
            return Err(CryptoError::Format("sealed blob too short".to_string()));
        }
        let wrapped_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let rest = &bytes[2..];
        if rest.len() < wrapped_len {
            return Err(CryptoError::Format("sealed blob truncated".to_string()));
        }
        let (wrapped, envelope) = rest.split_at(wrapped_len);
        Ok(Self {
            envelope: FileEnvelope::from_bytes(envelope.to_vec())?,
            wrapped_key: WrappedKey::from(wrapped.to_vec()),
        })
    }
}

/// Seals `plaintext` for the holder of `recipient`'s private key.
///
/// Each stage records a [`crate::ProgressState`] before the next begins. No
/// stage is retried: any primitive failure aborts the operation and is
/// recorded as the failing step.
pub fn seal_file(
    provider: &dyn CryptoProvider,
    plaintext: &[u8],
    recipient: &PublicKeyHandle,
    progress: &mut Progress,
) -> CryptoResult<SealedFile> {
    progress.begin(SEAL_STEPS);

    let file_key = provider
        .generate_file_key()
        .map_err(|e| progress.fail(e))?;
    progress.advance("generated random AES-256 file key");

    let digest = provider.sha256(plaintext);
    progress.advance("computed SHA-256 digest of file content");

    let mut payload = Vec::with_capacity(DIGEST_SIZE + plaintext.len());
    payload.extend_from_slice(&digest);
    payload.extend_from_slice(plaintext);

    let mut nonce = [0u8; NONCE_SIZE];
    let sealed = provider
        .fill_random(&mut nonce)
        .and_then(|()| provider.aes_gcm_seal(&file_key, &nonce, &payload));
    payload.zeroize();
    let ciphertext = sealed.map_err(|e| progress.fail(e))?;
    progress.advance("encrypted file content with AES-256-GCM");

    let wrapped = provider
        .rsa_wrap(recipient, file_key.as_bytes())
        .map_err(|e| progress.fail(e))?;
    progress.advance("wrapped file key with RSA-OAEP public key");

    let sealed = SealedFile {
        envelope: FileEnvelope::assemble(&nonce, &ciphertext),
        wrapped_key: WrappedKey::from(wrapped),
    };
    debug!(
        envelope_len = sealed.envelope.len(),
        wrapped_key_len = sealed.wrapped_key.len(),
        "sealed file envelope"
    );
    progress.advance("envelope ready to persist");
    Ok(sealed)
}

/// Opens an envelope with the private key matching the public key it was
/// sealed for, returning the verified plaintext.
///
/// Failures keep their classification: a wrong key fails the unwrap step as
/// [`CryptoError::KeyUnwrap`], corrupted or tampered ciphertext fails the
/// content step as [`CryptoError::ContentDecryption`], and a digest mismatch
/// after successful decryption fails the final step as
/// [`CryptoError::Integrity`].
pub fn open_file(
    provider: &dyn CryptoProvider,
    envelope: &FileEnvelope,
    wrapped_key: &WrappedKey,
    private: &PrivateKeyHandle,
    progress: &mut Progress,
) -> CryptoResult<Vec<u8>> {
    progress.begin(OPEN_STEPS);

    let mut raw = provider
        .rsa_unwrap(private, wrapped_key.as_bytes())
        .map_err(|e| progress.fail(e))?;
    if raw.len() != KEY_SIZE {
        // OAEP succeeded but the payload is not a file key; same caller
        // remedy as a failed unwrap.
        raw.zeroize();
        return Err(progress.fail(CryptoError::KeyUnwrap));
    }
    let mut key_bytes = [0u8; KEY_SIZE];
    key_bytes.copy_from_slice(&raw);
    raw.zeroize();
    let file_key = FileKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    if progress.diagnostics_enabled() {
        let mut data = BTreeMap::new();
        data.insert(
            "file_key_hex".to_string(),
            codec::encode_hex(file_key.as_bytes()),
        );
        progress.advance_with_data("unwrapped AES file key with private key", Some(data));
    } else {
        progress.advance("unwrapped AES file key with private key");
    }

    let nonce = envelope.nonce();
    let mut payload = provider
        .aes_gcm_open(&file_key, &nonce, envelope.ciphertext())
        .map_err(|e| progress.fail(e))?;
    progress.advance("decrypted file content");

    if payload.len() < DIGEST_SIZE {
        // A genuine seal always embeds the 32-byte digest; a shorter payload
        // means the envelope was not produced by this protocol.
        payload.zeroize();
        return Err(progress.fail(CryptoError::ContentDecryption));
    }
    let (digest, plaintext) = payload.split_at(DIGEST_SIZE);
    let recomputed = provider.sha256(plaintext);
    if digest != recomputed.as_slice() {
        // Deliberate second check on top of the GCM tag: catches key-reuse
        // and nonce handling defects one layer down.
        payload.zeroize();
        return Err(progress.fail(CryptoError::Integrity));
    }
    let plaintext = plaintext.to_vec();
    payload.zeroize();

    debug!(plaintext_len = plaintext.len(), "opened file envelope");
    if progress.diagnostics_enabled() {
        let mut data = BTreeMap::new();
        data.insert("digest_hex".to_string(), codec::encode_hex(&recomputed));
        progress.advance_with_data("integrity verified: digest matches", Some(data));
    } else {
        progress.advance("integrity verified: digest matches");
    }
    Ok(plaintext)
}
