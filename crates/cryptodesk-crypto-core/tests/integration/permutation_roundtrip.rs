//! Permutation cipher text scenarios.

use cryptodesk_crypto_core::permutation::{decrypt, encrypt};
use cryptodesk_crypto_core::{hex, CryptoError, PermutationKey};

#[test]
fn text_roundtrip_through_hex() {
    let key = PermutationKey::parse("3102").expect("key should parse");
    let message = "The quick brown fox";
    let ct_hex = hex::encode(&encrypt(message.as_bytes(), &key));
    let pt = decrypt(&hex::decode(&ct_hex).unwrap(), &key).expect("decrypt should succeed");
    assert_eq!(String::from_utf8(pt).unwrap(), message);
}

#[test]
fn duplicate_digit_key_is_invalid() {
    assert!(matches!(
        PermutationKey::parse("112"),
        Err(CryptoError::InvalidKey(_))
    ));
}

#[test]
fn longest_key_reverses_blocks() {
    let key = PermutationKey::parse("9876543210").expect("key should parse");
    let ct = encrypt(b"0123456789", &key);
    assert_eq!(&ct[..10], b"9876543210");
    assert_eq!(decrypt(&ct, &key).unwrap(), b"0123456789");
}

#[test]
fn decrypt_with_wrong_key_fails_padding() {
    let right = PermutationKey::parse("0123").unwrap();
    let wrong = PermutationKey::parse("3210").unwrap();
    // Final block "ef\x02\x02" comes back as "\x02\x02fe": 'e' is no pad byte.
    let ct = encrypt(b"abcdef", &right);
    assert!(matches!(decrypt(&ct, &wrong), Err(CryptoError::Decryption(_))));
}
