//! Injected crypto capability.
//!
//! The envelope operations never reach for an ambient crypto engine; every
//! primitive call goes through a [`CryptoProvider`] passed in by the caller.
//! Production code uses [`SystemProvider`]; tests substitute providers with
//! deterministic randomness to replay exact envelopes.
//!
//! Implementations outside this crate typically delegate to `SystemProvider`
//! and override only `fill_random`.

use crate::envelope::NONCE_SIZE;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{FileKey, KeyPair, PrivateKeyHandle, PublicKeyHandle, KEY_SIZE, RSA_MODULUS_BITS};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::{Oaep, RsaPrivateKey};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Cryptographic primitives required by the envelope protocol.
///
/// Error classification is part of the contract: `rsa_unwrap` failures are
/// reported as [`CryptoError::KeyUnwrap`] and `aes_gcm_open` failures as
/// [`CryptoError::ContentDecryption`], so that the decryptor surfaces them
/// to callers unchanged.
pub trait CryptoProvider: Send + Sync {
    /// Fills `dest` with cryptographically secure random bytes.
    fn fill_random(&self, dest: &mut [u8]) -> CryptoResult<()>;

    /// Generates a fresh 256-bit file key. Flows through `fill_random` so
    /// deterministic providers get reproducible keys for free.
    fn generate_file_key(&self) -> CryptoResult<FileKey> {
        let mut bytes = [0u8; KEY_SIZE];
        self.fill_random(&mut bytes)?;
        Ok(FileKey::from_bytes(bytes))
    }

    /// SHA-256 digest of `data`.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// AES-256-GCM encryption; returns ciphertext with the 16-byte tag appended.
    fn aes_gcm_seal(
        &self,
        key: &FileKey,
        nonce: &[u8; NONCE_SIZE],
        payload: &[u8],
    ) -> CryptoResult<Vec<u8>>;

    /// AES-256-GCM decryption with tag verification.
    fn aes_gcm_open(
        &self,
        key: &FileKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> CryptoResult<Vec<u8>>;

    /// RSA-OAEP (SHA-256) encryption of raw key bytes under a public key.
    fn rsa_wrap(&self, public: &PublicKeyHandle, key_bytes: &[u8]) -> CryptoResult<Vec<u8>>;

    /// RSA-OAEP (SHA-256) decryption of a wrapped key.
    fn rsa_unwrap(&self, private: &PrivateKeyHandle, wrapped: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Generates a fresh RSA key pair (2048-bit modulus, e = 65537).
    fn generate_keypair(&self) -> CryptoResult<KeyPair>;
}

/// Production provider backed by the OS entropy source and the RustCrypto
/// AES-GCM / RSA / SHA-2 implementations.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProvider;

impl SystemProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for SystemProvider {
    fn fill_random(&self, dest: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::Encryption(format!("entropy source failed: {e}")))
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn aes_gcm_seal(
        &self,
        key: &FileKey,
        nonce: &[u8; NONCE_SIZE],
        payload: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        cipher
            .encrypt(Nonce::from_slice(nonce), payload)
            .map_err(|_| CryptoError::Encryption("AES-256-GCM seal failed".to_string()))
    }

    fn aes_gcm_open(
        &self,
        key: &FileKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::ContentDecryption)
    }

    fn rsa_wrap(&self, public: &PublicKeyHandle, key_bytes: &[u8]) -> CryptoResult<Vec<u8>> {
        public
            .as_rsa()
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key_bytes)
            .map_err(|e| CryptoError::Encryption(format!("RSA-OAEP wrap failed: {e}")))
    }

    fn rsa_unwrap(&self, private: &PrivateKeyHandle, wrapped: &[u8]) -> CryptoResult<Vec<u8>> {
        private
            .as_rsa()
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| CryptoError::KeyUnwrap)
    }

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_MODULUS_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = private.to_public_key();
        debug!(modulus_bits = RSA_MODULUS_BITS, "generated RSA key pair");
        Ok(KeyPair {
            public: PublicKeyHandle::new(public),
            private: PrivateKeyHandle::new(private),
        })
    }
}
