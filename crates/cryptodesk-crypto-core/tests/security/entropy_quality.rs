//! Entropy checks on CSPRNG-backed outputs.
//!
//! Shannon entropy of uniform bytes approaches 8.0 bits/byte only for large
//! samples; for a 32-byte key the expected value is about 4.88. Thresholds
//! sit well below the expected values and only catch degenerate output
//! (all-zeros, repeated bytes, stuck generators).

use cryptodesk_crypto_core::gost::{self, Gost28147, KEY_LEN};
use cryptodesk_crypto_core::{GostIv, GostKey};

/// Shannon entropy of a byte slice (bits per byte).
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn generated_gost_key_entropy() {
    let key = GostKey::generate().expect("CSPRNG should succeed");
    let entropy = shannon_entropy(key.expose());
    assert!(
        entropy > 4.0,
        "GostKey::generate() entropy too low: {entropy:.4} (expected > 4.0)"
    );
}

#[test]
fn consecutive_keys_and_ivs_differ() {
    let a = GostKey::generate().expect("CSPRNG should succeed");
    let b = GostKey::generate().expect("CSPRNG should succeed");
    assert_ne!(a.expose(), b.expose(), "two generated keys are identical");

    let iv_a = GostIv::generate().expect("CSPRNG should succeed");
    let iv_b = GostIv::generate().expect("CSPRNG should succeed");
    assert_ne!(iv_a, iv_b, "two generated IVs are identical");
}

/// 64 KB of zeros under CFB must look random: the keystream, not the input,
/// dominates the output.
///
/// The key needs distinct subkeys. With `K1 == .. == K8` the round schedule
/// is a palindrome, encryption is an involution and the gamma cycles with
/// period two.
#[test]
fn cfb_ciphertext_of_zeros_has_high_entropy() {
    let key_bytes: Vec<u8> = (0..32u8).collect();
    let key = GostKey::from_bytes(&key_bytes).unwrap();
    let (_, ct) = gost::encrypt(&vec![0u8; 65_536], &key, None).expect("encrypt should succeed");
    let entropy = shannon_entropy(&ct);
    assert!(
        entropy > 7.99,
        "CFB ciphertext of zeros entropy too low: {entropy:.4} (expected > 7.99)"
    );
}

#[test]
fn same_plaintext_under_fresh_ivs_differs() {
    let key = GostKey::generate().unwrap();
    let (_, first) = gost::encrypt(b"repeat after me", &key, None).unwrap();
    let (_, second) = gost::encrypt(b"repeat after me", &key, None).unwrap();
    assert_ne!(first, second);
}

#[test]
fn equal_subkeys_make_encryption_an_involution() {
    let cipher = Gost28147::new(&GostKey::from_bytes(&[0x42; KEY_LEN]).unwrap());
    let block = *b"weak key";
    assert_eq!(cipher.encrypt_block(cipher.encrypt_block(block)), block);
}
