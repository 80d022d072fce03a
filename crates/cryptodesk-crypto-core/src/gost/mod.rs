//! GOST 28147-89 block cipher and its feedback stream mode.
//!
//! This module provides:
//! - [`GostKey`] / [`GostIv`]: 32-byte key and 8-byte IV with CSPRNG generation
//! - [`Gost28147`]: the 64-bit block cipher (32-round Feistel network)
//! - [`encrypt`] / [`decrypt`]: CFB ("gamming with feedback") over byte slices
//! - [`encrypt_stream`] / [`decrypt_stream`]: file form: IV bytes, then ciphertext
//!
//! # Parameters
//!
//! The S-box table is `id-tc26-gost-28147-param-Z`, the set fixed by
//! GOST R 34.12-2015 for the 64-bit "Magma" cipher. Key words and blocks are
//! big-endian, so the RFC 8891 test vectors apply. The key schedule is
//! `K1..K8` three times followed by `K8..K1`; decryption runs it backwards.

mod cfb;

pub use cfb::GostCfb;

use std::fmt;
use std::io::{Read, Write};

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hex;
use crate::stream::{as_u64, read_full};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// IV length in bytes (64 bits, one block).
pub const IV_LEN: usize = 8;

/// Block length in bytes (64 bits).
pub const BLOCK_LEN: usize = 8;

const KEY_HEX_LEN: usize = KEY_LEN * 2;
const IV_HEX_LEN: usize = IV_LEN * 2;

/// Working buffer for the stream variants. A multiple of the block size.
const STREAM_CHUNK_LEN: usize = 8 * 1024;

/// `π0..π7`; `π0` substitutes the least significant nibble.
const SBOX: [[u8; 16]; 8] = [
    [12, 4, 6, 2, 10, 5, 11, 9, 14, 8, 13, 7, 0, 3, 15, 1],
    [6, 8, 2, 3, 9, 10, 5, 12, 1, 14, 4, 7, 11, 13, 0, 15],
    [11, 3, 5, 8, 2, 15, 10, 13, 14, 1, 7, 4, 12, 9, 6, 0],
    [12, 8, 2, 1, 13, 4, 15, 6, 7, 0, 10, 5, 3, 14, 9, 11],
    [7, 15, 5, 10, 8, 1, 6, 13, 0, 9, 3, 14, 11, 4, 2, 12],
    [5, 13, 15, 6, 9, 2, 12, 10, 11, 7, 8, 1, 4, 3, 14, 0],
    [8, 14, 2, 5, 6, 9, 1, 12, 15, 4, 11, 0, 13, 10, 3, 7],
    [1, 7, 14, 13, 0, 5, 8, 3, 4, 15, 10, 6, 9, 12, 11, 2],
];

/// Subkey index per round for encryption.
const ENCRYPT_SCHEDULE: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, //
    0, 1, 2, 3, 4, 5, 6, 7, //
    0, 1, 2, 3, 4, 5, 6, 7, //
    7, 6, 5, 4, 3, 2, 1, 0,
];

/// Subkey index per round for decryption (encryption schedule reversed).
const DECRYPT_SCHEDULE: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, //
    7, 6, 5, 4, 3, 2, 1, 0, //
    7, 6, 5, 4, 3, 2, 1, 0, //
    7, 6, 5, 4, 3, 2, 1, 0,
];

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// 256-bit GOST key. Zeroized on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct GostKey {
    bytes: [u8; KEY_LEN],
}

impl GostKey {
    /// Generate a key from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyGeneration` if the CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyGeneration(format!("CSPRNG fill failed: {e}")))?;
        Ok(Self { bytes })
    }

    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyLength` unless `bytes` is exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes = <[u8; KEY_LEN]>::try_from(bytes).map_err(|_| {
            CryptoError::KeyLength(format!("{} bytes (expected {KEY_LEN})", bytes.len()))
        })?;
        Ok(Self { bytes })
    }

    /// Parse a key from 64 hex characters.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyLength` for any other length and
    /// `CryptoError::Format` for non-hex characters.
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        if key_hex.len() != KEY_HEX_LEN {
            return Err(CryptoError::KeyLength(format!(
                "{} hex characters (expected {KEY_HEX_LEN})",
                key_hex.len()
            )));
        }
        Ok(Self {
            bytes: hex::decode_exact(key_hex)?,
        })
    }

    /// Lower-case hex form (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Expose the raw key bytes for cryptographic operations.
    #[must_use]
    pub const fn expose(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for GostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GostKey(***)")
    }
}

/// 64-bit initialization vector. Not secret; travels with the ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GostIv([u8; IV_LEN]);

impl GostIv {
    /// Generate an IV from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyGeneration` if the CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::KeyGeneration(format!("CSPRNG fill failed: {e}")))?;
        Ok(Self(bytes))
    }

    /// Wrap raw IV bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::IvLength` unless `bytes` is exactly 8 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        <[u8; IV_LEN]>::try_from(bytes).map(Self).map_err(|_| {
            CryptoError::IvLength(format!("{} bytes (expected {IV_LEN})", bytes.len()))
        })
    }

    /// Parse an IV from 16 hex characters.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::IvLength` for any other length and
    /// `CryptoError::Format` for non-hex characters.
    pub fn from_hex(iv_hex: &str) -> Result<Self, CryptoError> {
        if iv_hex.len() != IV_HEX_LEN {
            return Err(CryptoError::IvLength(format!(
                "{} hex characters (expected {IV_HEX_LEN})",
                iv_hex.len()
            )));
        }
        hex::decode_exact(iv_hex).map(Self)
    }

    /// Lower-case hex form (16 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Raw IV bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Block cipher
// ---------------------------------------------------------------------------

/// Nibble-wise S-box substitution (`t` in RFC 8891).
#[must_use]
// shift stays below 32.
#[allow(clippy::arithmetic_side_effects)]
pub fn substitute(value: u32) -> u32 {
    SBOX.iter()
        .zip((0u32..32).step_by(4))
        .fold(0u32, |acc, (sbox, shift)| {
            let nibble = ((value >> shift) & 0xF) as usize;
            acc | (u32::from(sbox[nibble]) << shift)
        })
}

/// Round function `g[k](a) = rotl11(t(a + k mod 2^32))`.
#[must_use]
pub fn round_function(subkey: u32, half: u32) -> u32 {
    substitute(half.wrapping_add(subkey)).rotate_left(11)
}

/// GOST 28147-89 with an expanded key (eight 32-bit subkeys).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Gost28147 {
    subkeys: [u32; 8],
}

impl Gost28147 {
    /// Split the key into big-endian subkeys `K1..K8`.
    #[must_use]
    pub fn new(key: &GostKey) -> Self {
        let mut subkeys = [0u32; 8];
        for (subkey, word) in subkeys.iter_mut().zip(key.expose().chunks_exact(4)) {
            *subkey = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }
        Self { subkeys }
    }

    /// Encrypt one 64-bit block.
    #[must_use]
    pub fn encrypt_block(&self, block: [u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        self.feistel(block, &ENCRYPT_SCHEDULE)
    }

    /// Decrypt one 64-bit block.
    #[must_use]
    pub fn decrypt_block(&self, block: [u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
        self.feistel(block, &DECRYPT_SCHEDULE)
    }

    fn feistel(&self, block: [u8; BLOCK_LEN], schedule: &[usize; 32]) -> [u8; BLOCK_LEN] {
        let mut hi = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
        let mut lo = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);

        for &index in &schedule[..31] {
            let next_lo = round_function(self.subkeys[index], lo) ^ hi;
            hi = lo;
            lo = next_lo;
        }
        // Final round without the swap.
        hi ^= round_function(self.subkeys[schedule[31]], lo);

        let mut out = [0u8; BLOCK_LEN];
        out[..4].copy_from_slice(&hi.to_be_bytes());
        out[4..].copy_from_slice(&lo.to_be_bytes());
        out
    }
}

impl fmt::Debug for Gost28147 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gost28147(***)")
    }
}

// ---------------------------------------------------------------------------
// Stream mode
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` in CFB mode. Generates an IV when none is given.
///
/// Returns the IV actually used and a ciphertext of the same length as the
/// plaintext.
///
/// # Errors
///
/// Returns `CryptoError::KeyGeneration` if an IV had to be generated and the
/// CSPRNG failed.
pub fn encrypt(
    plaintext: &[u8],
    key: &GostKey,
    iv: Option<&GostIv>,
) -> Result<(GostIv, Vec<u8>), CryptoError> {
    let iv = match iv {
        Some(iv) => *iv,
        None => GostIv::generate()?,
    };
    let mut data = plaintext.to_vec();
    GostCfb::new(key, &iv).encrypt_in_place(&mut data);
    Ok((iv, data))
}

/// Decrypt CFB ciphertext produced with `key` and `iv`.
#[must_use]
pub fn decrypt(ciphertext: &[u8], key: &GostKey, iv: &GostIv) -> Vec<u8> {
    let mut data = ciphertext.to_vec();
    GostCfb::new(key, iv).decrypt_in_place(&mut data);
    data
}

/// Stream variant of [`encrypt`] producing the file form: the 8 IV bytes,
/// then the ciphertext.
///
/// Returns the IV used and the total number of bytes written (IV included).
///
/// # Errors
///
/// Returns `CryptoError::Io` on reader/writer failure and
/// `CryptoError::KeyGeneration` if IV generation fails.
pub fn encrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &GostKey,
    iv: Option<&GostIv>,
) -> Result<(GostIv, u64), CryptoError> {
    let iv = match iv {
        Some(iv) => *iv,
        None => GostIv::generate()?,
    };
    writer.write_all(iv.as_bytes())?;
    let mut written = as_u64(IV_LEN);

    let mut cfb = GostCfb::new(key, &iv);
    let mut buf = vec![0u8; STREAM_CHUNK_LEN];
    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        let chunk = &mut buf[..filled];
        cfb.encrypt_in_place(chunk);
        writer.write_all(chunk)?;
        written = written.saturating_add(as_u64(filled));
    }
    buf.zeroize();
    writer.flush()?;
    Ok((iv, written))
}

/// Stream variant of [`decrypt`] consuming the file form.
///
/// Returns the recovered IV and the number of plaintext bytes written.
///
/// # Errors
///
/// Returns `CryptoError::Format` if the input is shorter than an IV and
/// `CryptoError::Io` on reader/writer failure.
pub fn decrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &GostKey,
) -> Result<(GostIv, u64), CryptoError> {
    let mut iv_bytes = [0u8; IV_LEN];
    let filled = read_full(&mut reader, &mut iv_bytes)?;
    if filled < IV_LEN {
        return Err(CryptoError::Format(format!(
            "input too short to carry an IV: {filled} bytes (need {IV_LEN})"
        )));
    }
    let iv = GostIv(iv_bytes);

    let mut cfb = GostCfb::new(key, &iv);
    let mut buf = vec![0u8; STREAM_CHUNK_LEN];
    let mut written = 0u64;
    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        let chunk = &mut buf[..filled];
        cfb.decrypt_in_place(chunk);
        writer.write_all(chunk)?;
        written = written.saturating_add(as_u64(filled));
    }
    buf.zeroize();
    writer.flush()?;
    Ok((iv, written))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
