//! RSA key generation → hex export → encrypt → decrypt.

use cryptodesk_crypto_core::rsa::{decrypt, encrypt};
use cryptodesk_crypto_core::{
    generate_key_pair, hex, CryptoError, RsaPrivateKey, RsaPublicKey,
};

#[test]
fn generated_512_bit_key_roundtrips_text() {
    let pair = generate_key_pair(512).expect("key generation should succeed");
    assert_eq!(pair.modulus().bits(), 512);

    let exported = pair.to_hex();
    let public = RsaPublicKey::from_hex(&exported.modulus, &exported.public_exponent)
        .expect("public key hex should parse");
    let private = RsaPrivateKey::from_hex(&exported.modulus, &exported.private_exponent)
        .expect("private key hex should parse");

    let message = "Привет, RSA! Leading NULs survive too: \0\0";
    let ciphertext_hex =
        hex::encode(&encrypt(message.as_bytes(), &public).expect("encrypt should succeed"));
    let plaintext = decrypt(
        &hex::decode(&ciphertext_hex).expect("ciphertext hex should decode"),
        &private,
    )
    .expect("decrypt should succeed");
    assert_eq!(String::from_utf8(plaintext).unwrap(), message);
}

#[test]
fn upper_case_key_hex_is_accepted() {
    let pair = generate_key_pair(128).expect("key generation should succeed");
    let exported = pair.to_hex();
    let public = RsaPublicKey::from_hex(
        &exported.modulus.to_uppercase(),
        &exported.public_exponent.to_uppercase(),
    )
    .expect("upper-case hex should parse");
    assert_eq!(public, pair.public_key());
}

#[test]
fn ciphertext_from_another_key_fails_cleanly() {
    let alice = generate_key_pair(256).expect("key generation should succeed");
    let bob = generate_key_pair(256).expect("key generation should succeed");
    let ciphertext = encrypt(b"for alice only", &alice.public_key()).unwrap();
    let result = decrypt(&ciphertext, &bob.private_key());
    assert!(matches!(
        result,
        Err(CryptoError::Decryption(_) | CryptoError::Format(_))
    ));
}

#[test]
fn malformed_key_hex_is_format_error() {
    assert!(matches!(
        RsaPublicKey::from_hex("xyz", "10001"),
        Err(CryptoError::Format(_))
    ));
    assert!(matches!(
        RsaPrivateKey::from_hex("", "1"),
        Err(CryptoError::Format(_))
    ));
}
