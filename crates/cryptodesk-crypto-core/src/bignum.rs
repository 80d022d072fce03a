//! Arbitrary-precision unsigned integer helpers for RSA.
//!
//! Values are [`num_bigint::BigUint`]. This module adds what RSA needs on
//! top of it:
//! - [`from_hex`] / [`to_hex`]: strict parsing, canonical output
//! - [`mod_pow`]: square-and-multiply modular exponentiation
//! - [`mod_inverse`]: extended Euclidean algorithm
//! - [`is_probable_prime`] / [`random_prime`]: Miller-Rabin over `OsRng`

use crate::error::CryptoError;
use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::rngs::OsRng;

/// Miller-Rabin rounds used when the caller does not choose.
pub const DEFAULT_MR_ROUNDS: u32 = 25;

/// Odd primes below 256, used to discard most composite candidates before
/// running Miller-Rabin.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

// ---------------------------------------------------------------------------
// Hex conversion
// ---------------------------------------------------------------------------

/// Parse a big-endian hex string (either case, any length >= 1).
///
/// Leading zeros are accepted. `BigUint::parse_bytes` alone would also
/// accept `_` separators, so the digits are checked first.
///
/// # Errors
///
/// Returns `CryptoError::Format` for an empty string or any non-hex character.
pub fn from_hex(hex: &str) -> Result<BigUint, CryptoError> {
    if hex.is_empty() {
        return Err(CryptoError::Format("empty hex integer".into()));
    }
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(CryptoError::Format(format!(
            "invalid character {bad:?} in hex integer"
        )));
    }
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| CryptoError::Format("unparseable hex integer".into()))
}

/// Canonical lower-case hex: no leading zeros, zero is `"0"`.
#[must_use]
pub fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}

// ---------------------------------------------------------------------------
// Modular arithmetic
// ---------------------------------------------------------------------------

/// Compute `base^exponent mod modulus` by binary square-and-multiply.
///
/// `modulus == 1` yields `0`; `exponent == 0` yields `1 mod modulus`.
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if `modulus` is zero.
pub fn mod_pow(
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
) -> Result<BigUint, CryptoError> {
    if modulus.is_zero() {
        return Err(CryptoError::InvalidKey("modulus must be non-zero".into()));
    }
    Ok(pow_mod_nonzero(base, exponent, modulus))
}

/// Square-and-multiply over a modulus already known to be non-zero.
// modulus != 0 and `i + 1 <= bits`.
#[allow(clippy::arithmetic_side_effects)]
fn pow_mod_nonzero(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }
    let mut result = BigUint::one();
    let mut square = base % modulus;
    let bits = exponent.bits();
    for i in 0..bits {
        if exponent.bit(i) {
            result = (&result * &square) % modulus;
        }
        if i + 1 < bits {
            square = (&square * &square) % modulus;
        }
    }
    result
}

/// Multiplicative inverse of `a` modulo `m`, or `None` if `gcd(a, m) != 1`.
#[must_use]
// m != 0 and the loop only divides by a non-zero remainder.
#[allow(clippy::arithmetic_side_effects)]
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }
    let normalized = ((old_s % &modulus) + &modulus) % &modulus;
    normalized.to_biguint()
}

// ---------------------------------------------------------------------------
// Primality
// ---------------------------------------------------------------------------

/// Probabilistic primality test: trial division, then `rounds` Miller-Rabin
/// rounds with bases drawn from `OsRng`.
///
/// The false-positive probability for a composite is at most `4^-rounds`.
#[must_use]
// n is odd and above every small prime here, so `n - 1` and `% n` are safe.
#[allow(clippy::arithmetic_side_effects)]
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if !n.bit(0) {
        return false;
    }
    for &p in &SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^s * d with d odd.
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut rng = OsRng;
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = pow_mod_nonzero(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }
        return false;
    }
    true
}

/// Draw a random probable prime of exactly `bits` bits.
///
/// The two most significant bits are forced to one so the product of a
/// `b1`-bit and a `b2`-bit prime always has exactly `b1 + b2` bits.
///
/// # Errors
///
/// Returns `CryptoError::KeyGeneration` if `bits < 2`.
pub fn random_prime(bits: u32, rounds: u32) -> Result<BigUint, CryptoError> {
    if bits < 2 {
        return Err(CryptoError::KeyGeneration(format!(
            "prime bit length must be at least 2 (got {bits})"
        )));
    }
    let bits = u64::from(bits);
    let mut rng = OsRng;
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits.saturating_sub(1), true);
        candidate.set_bit(bits.saturating_sub(2), true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, rounds) {
            return Ok(candidate);
        }
    }
}
