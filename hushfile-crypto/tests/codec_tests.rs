use hushfile_crypto::{
    decode_hex, encode_hex, export_private_key, export_public_key, import_private_key,
    import_public_key, open_file, seal_file, CryptoError, Progress,
};
use pretty_assertions::assert_eq;

mod support;
use support::{intruder, provider, recipient};

// ── Hex Codec ──

#[test]
fn hex_round_trip() {
    let bytes = [0x00, 0x01, 0xAB, 0xCD, 0xEF, 0xFF];
    let hex = encode_hex(&bytes);
    assert_eq!(hex, "0001abcdefff");
    assert_eq!(decode_hex(&hex).unwrap(), bytes);
}

#[test]
fn encode_hex_is_lowercase_without_separators() {
    let hex = encode_hex(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(hex, "deadbeef");
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn decode_hex_accepts_mixed_case() {
    assert_eq!(decode_hex("ABcd12").unwrap(), [0xAB, 0xCD, 0x12]);
}

#[test]
fn decode_hex_rejects_odd_length() {
    let err = decode_hex("abc").unwrap_err();
    assert!(matches!(err, CryptoError::Format(_)), "got: {err:?}");
}

#[test]
fn decode_hex_rejects_non_hex_characters() {
    let err = decode_hex("zzzz").unwrap_err();
    assert!(matches!(err, CryptoError::Format(_)));

    // Whitespace is not tolerated either.
    assert!(decode_hex("ab cd").is_err());
}

#[test]
fn empty_hex_decodes_to_empty() {
    assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    assert_eq!(encode_hex(&[]), "");
}

// ── Key Import/Export ──

#[test]
fn public_key_hex_round_trip() {
    let exported = export_public_key(&recipient().public).unwrap();
    assert_eq!(exported.len() % 2, 0);
    assert!(exported.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let imported = import_public_key(&exported).unwrap();
    assert_eq!(export_public_key(&imported).unwrap(), exported);
}

#[test]
fn private_key_hex_round_trip() {
    let exported = export_private_key(&recipient().private).unwrap();
    let imported = import_private_key(&exported).unwrap();

    // The re-imported private key derives the same public key.
    assert_eq!(
        export_public_key(&imported.public_key()).unwrap(),
        export_public_key(&recipient().public).unwrap()
    );
}

#[test]
fn imported_keys_seal_and_open() {
    let pair_hex = recipient().to_hex().unwrap();
    let public = import_public_key(&pair_hex.public_key).unwrap();
    let private = import_private_key(&pair_hex.private_key).unwrap();

    let mut progress = Progress::new();
    let sealed = seal_file(&provider(), b"via hex transport", &public, &mut progress).unwrap();

    let mut progress = Progress::new();
    let plaintext = open_file(
        &provider(),
        &sealed.envelope,
        &sealed.wrapped_key,
        &private,
        &mut progress,
    )
    .unwrap();
    assert_eq!(plaintext, b"via hex transport");
}

#[test]
fn import_public_key_rejects_invalid_hex() {
    let err = import_public_key("not hex at all").unwrap_err();
    assert!(matches!(err, CryptoError::InvalidPublicKey(_)), "got: {err:?}");
}

#[test]
fn import_public_key_rejects_garbage_der() {
    let err = import_public_key("deadbeefdeadbeef").unwrap_err();
    assert!(matches!(err, CryptoError::InvalidPublicKey(_)));
}

#[test]
fn import_private_key_rejects_public_key_material() {
    let public_hex = export_public_key(&recipient().public).unwrap();
    let err = import_private_key(&public_hex).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidPrivateKey(_)));
}

#[test]
fn import_public_key_rejects_private_key_material() {
    let private_hex = export_private_key(&recipient().private).unwrap();
    let err = import_public_key(&private_hex).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidPublicKey(_)));
}

// ── Key Pair Properties ──

#[test]
fn generated_pairs_differ() {
    let a = recipient().to_hex().unwrap();
    let b = intruder().to_hex().unwrap();
    assert_ne!(a.public_key, b.public_key);
    assert_ne!(a.private_key, b.private_key);
}

#[test]
fn fingerprint_is_stable_and_short() {
    let fp1 = recipient().public.fingerprint().unwrap();
    let fp2 = recipient().public.fingerprint().unwrap();
    assert_eq!(fp1, fp2);
    assert_eq!(fp1.len(), 16);

    assert_ne!(fp1, intruder().public.fingerprint().unwrap());
}

#[test]
fn key_pair_hex_debug_redacts_private_key() {
    let pair_hex = recipient().to_hex().unwrap();
    let debug_str = format!("{pair_hex:?}");
    assert!(debug_str.contains("REDACTED"));
    assert!(!debug_str.contains(&pair_hex.private_key));
}

#[test]
fn private_key_handle_debug_redacts() {
    let debug_str = format!("{:?}", recipient().private);
    assert!(debug_str.contains("REDACTED"));
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn hex_always_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let hex = encode_hex(&bytes);
            prop_assert_eq!(hex.len(), bytes.len() * 2);
            prop_assert_eq!(decode_hex(&hex).unwrap(), bytes);
        }
    }
}
