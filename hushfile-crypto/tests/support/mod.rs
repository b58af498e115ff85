//! Shared test helpers: RSA-2048 generation is expensive, so key pairs are
//! created once and shared across tests.

#![allow(dead_code)]

use hushfile_crypto::{CryptoProvider, KeyPair, SystemProvider};
use std::sync::OnceLock;

pub fn provider() -> SystemProvider {
    SystemProvider::new()
}

/// Key pair the test files are sealed for.
pub fn recipient() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| provider().generate_keypair().expect("key generation must succeed"))
}

/// Unrelated key pair for wrong-key tests.
pub fn intruder() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| provider().generate_keypair().expect("key generation must succeed"))
}
