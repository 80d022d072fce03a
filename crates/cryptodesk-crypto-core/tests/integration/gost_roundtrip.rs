//! GOST key/IV generation and the text and file envelopes.

use cryptodesk_crypto_core::gost::{self, decrypt_stream, encrypt_stream, IV_LEN};
use cryptodesk_crypto_core::{hex, CryptoError, GostIv, GostKey};

const ZERO_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000000";
const ZERO_IV: &str = "0000000000000000";

#[test]
fn zero_key_zero_iv_text_scenario() {
    let key = GostKey::from_hex(ZERO_KEY).expect("zero key should parse");
    let iv = GostIv::from_hex(ZERO_IV).expect("zero IV should parse");

    let (used, ct) = gost::encrypt(b"TEST", &key, Some(&iv)).expect("encrypt should succeed");
    let ct_hex = hex::encode(&ct);
    assert_eq!(ct_hex.len(), 8);
    assert_eq!(used.to_hex(), ZERO_IV);

    let pt = gost::decrypt(&hex::decode(&ct_hex).unwrap(), &key, &used);
    assert_eq!(pt, b"TEST");
}

#[test]
fn generated_key_and_iv_have_expected_hex_lengths() {
    let key = GostKey::generate().expect("key generation should succeed");
    let iv = GostIv::generate().expect("IV generation should succeed");
    assert_eq!(key.to_hex().len(), 64);
    assert_eq!(iv.to_hex().len(), 16);
    assert!(key.to_hex().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn wrong_key_garbles_without_error() {
    let key = GostKey::generate().unwrap();
    let other = GostKey::generate().unwrap();
    let (iv, ct) = gost::encrypt(b"a reasonably long message", &key, None).unwrap();
    assert_ne!(gost::decrypt(&ct, &other, &iv), b"a reasonably long message");
}

#[test]
fn file_envelope_roundtrip_with_generated_iv() {
    let key = GostKey::generate().unwrap();
    let plaintext: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();

    let mut file = Vec::new();
    let (iv, written) =
        encrypt_stream(plaintext.as_slice(), &mut file, &key, None).expect("encrypt should succeed");
    assert_eq!(written as usize, plaintext.len() + IV_LEN);
    assert_eq!(&file[..IV_LEN], iv.as_bytes());

    let mut out = Vec::new();
    decrypt_stream(file.as_slice(), &mut out, &key).expect("decrypt should succeed");
    assert_eq!(out, plaintext);
}

#[test]
fn key_and_iv_length_errors_are_distinct() {
    assert!(matches!(
        GostKey::from_hex("00ff"),
        Err(CryptoError::KeyLength(_))
    ));
    assert!(matches!(
        GostIv::from_hex("00ff"),
        Err(CryptoError::IvLength(_))
    ));
}
