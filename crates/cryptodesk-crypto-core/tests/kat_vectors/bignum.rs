//! Textbook RSA and modular arithmetic vectors.

use cryptodesk_crypto_core::bignum::{from_hex, is_probable_prime, mod_inverse, mod_pow, to_hex};
use cryptodesk_crypto_core::RsaKeyPair;
use num_bigint::BigUint;

fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

// ── Textbook RSA: p = 61, q = 53, n = 3233, e = 17 ────────────────────

#[test]
fn textbook_rsa_with_carmichael_lambda() {
    let pair = RsaKeyPair::from_primes(&big(61), &big(53), 17)
        .expect("textbook primes should form a key");
    assert_eq!(*pair.modulus(), big(3233));
    assert_eq!(*pair.public_exponent(), big(17));
    // λ(3233) = lcm(60, 52) = 780, and 17 * 413 = 9 * 780 + 1.
    assert_eq!(*pair.private_exponent(), big(413));

    let c = mod_pow(&big(65), &big(17), &big(3233)).expect("mod_pow should succeed");
    assert_eq!(c, big(2790));
    let m = mod_pow(&c, pair.private_exponent(), &big(3233)).expect("mod_pow should succeed");
    assert_eq!(m, big(65));
    // The φ-based exponent decrypts too.
    assert_eq!(mod_pow(&c, &big(2753), &big(3233)).unwrap(), big(65));
}

#[test]
fn mod_inverse_vectors() {
    assert_eq!(mod_inverse(&big(17), &big(780)), Some(big(413)));
    assert_eq!(mod_inverse(&big(65_537), &big(3_120)), Some(big(2_753)));
}

#[test]
fn fermat_f4_is_prime() {
    assert!(is_probable_prime(&from_hex("10001").unwrap(), 30));
    // 2^64 + 1 = 274177 * 67280421310721
    assert!(!is_probable_prime(&from_hex("10000000000000001").unwrap(), 30));
}

#[test]
fn hex_is_canonical_lowercase() {
    let n = from_hex("00000000DEADBEEF").unwrap();
    assert_eq!(to_hex(&n), "deadbeef");
    assert_eq!(n, big(0xDEAD_BEEF));
}
