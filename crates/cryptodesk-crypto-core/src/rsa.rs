//! RSA key generation and block encryption.
//!
//! This module provides:
//! - [`generate_key_pair`] / [`generate_key_pair_with`]: random `(n, e, d)`
//! - [`encrypt`] / [`decrypt`]: block-split transform over byte slices
//! - [`encrypt_stream`] / [`decrypt_stream`]: the same transform over `Read`/`Write`
//!
//! # Block Framing
//!
//! Let `k` be the byte length of `n`. Plaintext is cut into chunks of at most
//! `k - 2` bytes and each chunk is encrypted as the integer `0x01 || chunk`.
//! The marker byte keeps leading zero bytes of the chunk and fixes its
//! length, and the framed value is always below `2^(8(k-1)) <= n`.
//! Ciphertext blocks are written big-endian into exactly `k` bytes.
//!
//! On decryption every block must come back with the marker and, except for
//! the last one, a full `k - 2` byte payload. Anything else is reported as
//! [`CryptoError::Decryption`]: the usual causes are a mismatched key pair or
//! data that was not produced by this engine.

use std::fmt;
use std::io::{Read, Write};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bignum::{self, DEFAULT_MR_ROUNDS};
use crate::error::CryptoError;
use crate::stream::{as_u64, read_full};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest modulus size accepted by key generation.
pub const MIN_KEY_BITS: u32 = 32;

/// Largest modulus size accepted by key generation.
pub const MAX_KEY_BITS: u32 = 8192;

/// Preferred public exponent (F4).
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

/// Default modulus size for [`KeyGenParams::default`].
pub const DEFAULT_KEY_BITS: u32 = 2048;

/// Leading byte of every framed plaintext block.
const FRAME_MARKER: u8 = 0x01;

/// Frame marker plus one spare byte keep the framed value below `n`.
const FRAME_OVERHEAD: usize = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Public half of an RSA key: `(n, e)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: BigUint,
    e: BigUint,
}

/// Private half of an RSA key: `(n, d)`. `Debug` masks `d`; zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateKey {
    n: BigUint,
    d: BigUint,
}

/// Complete RSA key material `(n, e, d)`, created atomically by key generation.
/// Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaKeyPair {
    n: BigUint,
    e: BigUint,
    d: BigUint,
}

/// Key generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyGenParams {
    /// Modulus size in bits, within [`MIN_KEY_BITS`]..=[`MAX_KEY_BITS`].
    pub bits: u32,
    /// Miller-Rabin rounds per prime candidate.
    pub mr_rounds: u32,
    /// Preferred public exponent; replaced by the smallest valid odd exponent
    /// when it is not coprime with `λ(n)` or too large for the modulus.
    pub public_exponent: u32,
}

impl Default for KeyGenParams {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS,
            mr_rounds: DEFAULT_MR_ROUNDS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
        }
    }
}

fn check_nonzero(value: &BigUint, what: &str) -> Result<(), CryptoError> {
    if value.is_zero() {
        return Err(CryptoError::InvalidKey(format!("{what} must be non-zero")));
    }
    Ok(())
}

/// Byte length `k` of the modulus.
fn modulus_len(n: &BigUint) -> usize {
    n.to_bytes_be().len()
}

/// Largest plaintext chunk a `k`-byte modulus can carry.
fn chunk_len_for(k: usize) -> Option<usize> {
    k.checked_sub(FRAME_OVERHEAD).filter(|len| *len > 0)
}

impl RsaPublicKey {
    /// Build a public key from `(n, e)`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if `n` or `e` is zero.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self, CryptoError> {
        check_nonzero(&n, "modulus n")?;
        check_nonzero(&e, "public exponent e")?;
        Ok(Self { n, e })
    }

    /// Parse a public key from hex-encoded `n` and `e`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` for malformed hex and
    /// `CryptoError::InvalidKey` for zero values.
    pub fn from_hex(n_hex: &str, e_hex: &str) -> Result<Self, CryptoError> {
        Self::new(bignum::from_hex(n_hex)?, bignum::from_hex(e_hex)?)
    }

    /// Modulus `n`.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Public exponent `e`.
    #[must_use]
    pub const fn exponent(&self) -> &BigUint {
        &self.e
    }

    /// Ciphertext block size `k` in bytes.
    #[must_use]
    pub fn block_len(&self) -> usize {
        modulus_len(&self.n)
    }

    /// Largest plaintext chunk per block (`k - 2`).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if the modulus is below `2^16` and
    /// cannot carry even one framed byte.
    pub fn max_chunk_len(&self) -> Result<usize, CryptoError> {
        chunk_len_for(self.block_len()).ok_or_else(|| {
            CryptoError::Encryption(format!(
                "modulus too small: {} bits cannot hold a framed plaintext byte",
                self.n.bits()
            ))
        })
    }
}

impl RsaPrivateKey {
    /// Build a private key from `(n, d)`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if `n` or `d` is zero.
    pub fn new(n: BigUint, d: BigUint) -> Result<Self, CryptoError> {
        check_nonzero(&n, "modulus n")?;
        check_nonzero(&d, "private exponent d")?;
        Ok(Self { n, d })
    }

    /// Parse a private key from hex-encoded `n` and `d`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` for malformed hex and
    /// `CryptoError::InvalidKey` for zero values.
    pub fn from_hex(n_hex: &str, d_hex: &str) -> Result<Self, CryptoError> {
        Self::new(bignum::from_hex(n_hex)?, bignum::from_hex(d_hex)?)
    }

    /// Modulus `n`.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Ciphertext block size `k` in bytes.
    #[must_use]
    pub fn block_len(&self) -> usize {
        modulus_len(&self.n)
    }

    fn chunk_len(&self) -> Result<usize, CryptoError> {
        chunk_len_for(self.block_len()).ok_or_else(|| {
            CryptoError::Decryption(format!(
                "modulus too small: {} bits cannot carry framed blocks",
                self.n.bits()
            ))
        })
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n_bits", &self.n.bits())
            .field("d", &"***")
            .finish()
    }
}

impl RsaKeyPair {
    /// Assemble key material from two distinct primes.
    ///
    /// `d` is the inverse of `e` modulo `λ(n) = lcm(p-1, q-1)`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyGeneration` if `p == q`, either value is
    /// below 3, or no valid public exponent exists.
    // p, q >= 3 past the guards, so `p - 1` and `q - 1` are positive.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn from_primes(
        p: &BigUint,
        q: &BigUint,
        preferred_exponent: u32,
    ) -> Result<Self, CryptoError> {
        let three = BigUint::from(3u32);
        if p == q {
            return Err(CryptoError::KeyGeneration("p and q must be distinct".into()));
        }
        if *p < three || *q < three {
            return Err(CryptoError::KeyGeneration(
                "primes must be at least 3".into(),
            ));
        }

        let n = p * q;
        let lambda = (p - 1u32).lcm(&(q - 1u32));
        let e = choose_public_exponent(preferred_exponent, &lambda)?;
        let d = bignum::mod_inverse(&e, &lambda).ok_or_else(|| {
            CryptoError::KeyGeneration("public exponent has no inverse modulo λ(n)".into())
        })?;
        Ok(Self { n, e, d })
    }

    /// Modulus `n`.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Public exponent `e`.
    #[must_use]
    pub const fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    /// Private exponent `d`. Keep exposure minimal.
    #[must_use]
    pub const fn private_exponent(&self) -> &BigUint {
        &self.d
    }

    /// Encryption half `(n, e)`.
    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    /// Decryption half `(n, d)`.
    #[must_use]
    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey {
            n: self.n.clone(),
            d: self.d.clone(),
        }
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("n_bits", &self.n.bits())
            .field("e", &self.e)
            .field("d", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Hex export
// ---------------------------------------------------------------------------

/// Key pair as canonical lower-case hex strings, the form shown to users and
/// accepted back by [`RsaPublicKey::from_hex`] / [`RsaPrivateKey::from_hex`].
///
/// Serializes as `{"modulus", "publicExponent", "privateExponent"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairHex {
    pub modulus: String,
    pub public_exponent: String,
    pub private_exponent: String,
}

impl RsaKeyPair {
    /// Export `(n, e, d)` as hex.
    #[must_use]
    pub fn to_hex(&self) -> KeyPairHex {
        KeyPairHex {
            modulus: bignum::to_hex(&self.n),
            public_exponent: bignum::to_hex(&self.e),
            private_exponent: bignum::to_hex(&self.d),
        }
    }
}

impl KeyPairHex {
    /// Parse the hex strings back into key halves.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` for malformed hex and
    /// `CryptoError::InvalidKey` for zero values.
    pub fn parse(&self) -> Result<(RsaPublicKey, RsaPrivateKey), CryptoError> {
        Ok((
            RsaPublicKey::from_hex(&self.modulus, &self.public_exponent)?,
            RsaPrivateKey::from_hex(&self.modulus, &self.private_exponent)?,
        ))
    }
}

impl fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("modulus", &self.modulus)
            .field("public_exponent", &self.public_exponent)
            .field("private_exponent", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Key generation
// ---------------------------------------------------------------------------

/// Generate an RSA key pair with a `bits`-bit modulus and default parameters.
///
/// # Errors
///
/// Returns `CryptoError::KeyGeneration` if `bits` is outside
/// [`MIN_KEY_BITS`]..=[`MAX_KEY_BITS`].
pub fn generate_key_pair(bits: u32) -> Result<RsaKeyPair, CryptoError> {
    generate_key_pair_with(&KeyGenParams {
        bits,
        ..KeyGenParams::default()
    })
}

/// Generate an RSA key pair.
///
/// Draws `p` with `bits - bits/2` bits and `q` with `bits/2` bits (both with
/// their two top bits set, so `n` has exactly `bits` bits), re-drawing `q`
/// while it equals `p`.
///
/// # Errors
///
/// Returns `CryptoError::KeyGeneration` if the bit length is out of range,
/// `mr_rounds` is zero, or no public exponent fits.
pub fn generate_key_pair_with(params: &KeyGenParams) -> Result<RsaKeyPair, CryptoError> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&params.bits) {
        return Err(CryptoError::KeyGeneration(format!(
            "key size {} bits outside supported range {MIN_KEY_BITS}..={MAX_KEY_BITS}",
            params.bits
        )));
    }
    if params.mr_rounds == 0 {
        return Err(CryptoError::KeyGeneration(
            "at least one Miller-Rabin round is required".into(),
        ));
    }

    // bits was bounds-checked above.
    #[allow(clippy::arithmetic_side_effects)]
    let q_bits = params.bits / 2;
    let p_bits = params.bits.saturating_sub(q_bits);

    let p = bignum::random_prime(p_bits, params.mr_rounds)?;
    let mut q = bignum::random_prime(q_bits, params.mr_rounds)?;
    while q == p {
        q = bignum::random_prime(q_bits, params.mr_rounds)?;
    }

    RsaKeyPair::from_primes(&p, &q, params.public_exponent)
}

/// Pick `e`: the preferred exponent when valid, else the smallest odd
/// `e >= 3` coprime with `λ(n)`.
// e is bounded by λ(n).
#[allow(clippy::arithmetic_side_effects)]
fn choose_public_exponent(preferred: u32, lambda: &BigUint) -> Result<BigUint, CryptoError> {
    let preferred = BigUint::from(preferred);
    if preferred > BigUint::one() && preferred < *lambda && preferred.gcd(lambda).is_one() {
        return Ok(preferred);
    }

    let mut e = BigUint::from(3u32);
    while e < *lambda {
        if e.gcd(lambda).is_one() {
            return Ok(e);
        }
        e += 2u32;
    }
    Err(CryptoError::KeyGeneration(
        "no public exponent coprime with λ(n)".into(),
    ))
}

// ---------------------------------------------------------------------------
// Block transform
// ---------------------------------------------------------------------------

/// Left-pad big-endian bytes with zeros to exactly `len` bytes.
fn to_fixed_width(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

fn encrypt_block(chunk: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
    let mut framed = Vec::with_capacity(chunk.len().saturating_add(1));
    framed.push(FRAME_MARKER);
    framed.extend_from_slice(chunk);

    let m = BigUint::from_bytes_be(&framed);
    if m >= key.n {
        return Err(CryptoError::Encryption(
            "plaintext block integer is not below the modulus".into(),
        ));
    }
    let c = bignum::mod_pow(&m, &key.e, &key.n)?;
    Ok(to_fixed_width(&c, key.block_len()))
}

fn decrypt_block(block: &[u8], key: &RsaPrivateKey, chunk_len: usize) -> Result<Vec<u8>, CryptoError> {
    let c = BigUint::from_bytes_be(block);
    if c >= key.n {
        return Err(CryptoError::Decryption(
            "ciphertext block integer is not below the modulus".into(),
        ));
    }
    let m = bignum::mod_pow(&c, &key.d, &key.n)?;
    match m.to_bytes_be().split_first() {
        Some((&FRAME_MARKER, payload)) if !payload.is_empty() && payload.len() <= chunk_len => {
            Ok(payload.to_vec())
        }
        _ => Err(CryptoError::Decryption(
            "block frame invalid (wrong key or foreign ciphertext)".into(),
        )),
    }
}

/// Encrypt `plaintext` block by block. Empty input yields empty output.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the modulus is too small for the
/// block framing.
pub fn encrypt(plaintext: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
    let chunk_len = key.max_chunk_len()?;
    let k = key.block_len();
    let blocks = plaintext.len().div_ceil(chunk_len);
    let mut out = Vec::with_capacity(blocks.saturating_mul(k));
    for chunk in plaintext.chunks(chunk_len) {
        out.extend_from_slice(&encrypt_block(chunk, key)?);
    }
    Ok(out)
}

/// Decrypt ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// Returns `CryptoError::Format` if the length is not a multiple of the
/// block size, and `CryptoError::Decryption` if any block fails to decrypt
/// into a valid frame.
pub fn decrypt(ciphertext: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, CryptoError> {
    let chunk_len = key.chunk_len()?;
    let k = key.block_len();
    if ciphertext.len().checked_rem(k) != Some(0) {
        return Err(CryptoError::Format(format!(
            "ciphertext length {} is not a multiple of the {k}-byte block size",
            ciphertext.len()
        )));
    }

    // k > 0 once chunk_len succeeded.
    #[allow(clippy::arithmetic_side_effects)]
    let block_count = ciphertext.len() / k;
    let mut out = Vec::with_capacity(block_count.saturating_mul(chunk_len));
    for (index, block) in ciphertext.chunks(k).enumerate() {
        let payload = decrypt_block(block, key, chunk_len)?;
        let is_last = index.saturating_add(1) == block_count;
        if !is_last && payload.len() != chunk_len {
            return Err(CryptoError::Decryption(
                "short block before end of ciphertext".into(),
            ));
        }
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// Stream variant of [`encrypt`]. Returns the number of bytes written.
///
/// # Errors
///
/// Same as [`encrypt`], plus `CryptoError::Io` for reader/writer failures.
pub fn encrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &RsaPublicKey,
) -> Result<u64, CryptoError> {
    let chunk_len = key.max_chunk_len()?;
    let mut buf = vec![0u8; chunk_len];
    let mut written = 0u64;
    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        let block = encrypt_block(&buf[..filled], key)?;
        writer.write_all(&block)?;
        written = written.saturating_add(as_u64(block.len()));
        if filled < chunk_len {
            break;
        }
    }
    writer.flush()?;
    Ok(written)
}

/// Stream variant of [`decrypt`]. Returns the number of bytes written.
///
/// Each payload is held back until the next block arrives, so the
/// "only the last block may be short" rule can be checked.
///
/// # Errors
///
/// Same as [`decrypt`], plus `CryptoError::Io` for reader/writer failures.
pub fn decrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &RsaPrivateKey,
) -> Result<u64, CryptoError> {
    let chunk_len = key.chunk_len()?;
    let k = key.block_len();
    let mut buf = vec![0u8; k];
    let mut pending: Option<Vec<u8>> = None;
    let mut written = 0u64;

    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        if filled < k {
            return Err(CryptoError::Format(format!(
                "truncated ciphertext: trailing block of {filled} bytes (expected {k})"
            )));
        }
        let payload = decrypt_block(&buf, key, chunk_len)?;
        if let Some(previous) = pending.replace(payload) {
            if previous.len() != chunk_len {
                return Err(CryptoError::Decryption(
                    "short block before end of ciphertext".into(),
                ));
            }
            writer.write_all(&previous)?;
            written = written.saturating_add(as_u64(previous.len()));
        }
    }
    if let Some(last) = pending {
        writer.write_all(&last)?;
        written = written.saturating_add(as_u64(last.len()));
    }
    writer.flush()?;
    Ok(written)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
