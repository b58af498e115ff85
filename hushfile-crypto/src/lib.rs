//! Encryption core for Hushfile.
//!
//! Files are encrypted on the client before they leave the device and
//! decrypted only by the holder of the matching private key; the server
//! stores opaque blobs. This crate implements the hybrid envelope that makes
//! that work:
//!
//! - AES-256-GCM for bulk content encryption under a one-time file key
//! - RSA-OAEP (SHA-256, 2048-bit) for wrapping the file key per recipient
//! - SHA-256 content digest sealed inside the authenticated payload
//!
//! # Architecture
//!
//! Every seal operation generates a fresh symmetric **file key**, encrypts
//! `digest ‖ plaintext` under it with a random nonce, and wraps the raw key
//! bytes with the recipient's public key. Opening reverses the three layers,
//! classifying each failure precisely: wrong private key, corrupted
//! ciphertext, or digest mismatch.
//!
//! Operations record staged progress into a caller-owned [`Progress`] value
//! (optionally streamed through a channel) and route every primitive call
//! through an injected [`CryptoProvider`], so the whole protocol is
//! replayable and testable without an ambient crypto engine.

mod codec;
pub mod envelope;
mod error;
mod key;
pub mod progress;
pub mod provider;

pub use codec::{
    decode_hex, encode_hex, export_private_key, export_public_key, import_private_key,
    import_public_key,
};
pub use envelope::{
    open_file, seal_file, FileEnvelope, SealedFile, WrappedKey, DIGEST_SIZE, MIN_ENVELOPE_SIZE,
    NONCE_SIZE, OPEN_STEPS, SEAL_STEPS, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{FileKey, KeyPair, KeyPairHex, PrivateKeyHandle, PublicKeyHandle, KEY_SIZE, RSA_MODULUS_BITS};
pub use progress::{Progress, ProgressState, StepOutcome};
pub use provider::{CryptoProvider, SystemProvider};
