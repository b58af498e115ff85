//! Crypto error types.
//!
//! Every failure is terminal for the current operation and carries its
//! classification intact: callers rely on the variant to tell a wrong key
//! apart from corrupted data or tampering. Nothing here is retried.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening file envelopes.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed hex input (odd length or non-hex characters).
    #[error("invalid hex input: {0}")]
    Format(String),

    /// Public key failed to parse as an SPKI-encoded RSA key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Private key failed to parse as a PKCS#8-encoded RSA key.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Key pair generation failed in the underlying engine. Fatal.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A primitive failed while sealing (entropy source, AES seal, RSA wrap).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// RSA-OAEP unwrap of the file key failed. Almost always a wrong or
    /// mismatched private key.
    #[error("failed to unwrap file key (wrong or mismatched private key)")]
    KeyUnwrap,

    /// AES-GCM authentication failed: corrupted or tampered ciphertext.
    #[error("failed to decrypt file content (corrupted or tampered ciphertext)")]
    ContentDecryption,

    /// Decrypted content does not match the digest sealed alongside it.
    #[error("integrity check failed: decrypted content does not match its digest")]
    Integrity,
}
