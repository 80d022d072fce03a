//! Block transposition cipher keyed by a digit permutation.
//!
//! The key is a string such as `"2013"`: block length `N` is the number of
//! digits, and digit `i` names the input position that lands at output
//! position `i` (`out[i] = block[key[i]]`). Input is padded PKCS#7-style to a
//! multiple of `N`; a full block of padding is added when the input is
//! already aligned, so decryption can always strip it.
//!
//! Toy cipher: it hides nothing about byte values.

use std::io::{Read, Write};

use crate::error::CryptoError;
use crate::stream::{as_u64, read_full};

/// Shortest accepted key.
pub const MIN_BLOCK_LEN: usize = 2;

/// Longest accepted key (digits `0..=9`).
pub const MAX_BLOCK_LEN: usize = 10;

/// Blocks handled per read in the stream variants.
const BLOCKS_PER_CHUNK: usize = 1024;

/// A validated permutation of `0..N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationKey {
    forward: Vec<usize>,
}

impl PermutationKey {
    /// Parse a digit string into a permutation.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` unless the string has 2 to 10
    /// characters and contains each digit `0..N-1` exactly once.
    pub fn parse(digits: &str) -> Result<Self, CryptoError> {
        let n = digits.chars().count();
        if !(MIN_BLOCK_LEN..=MAX_BLOCK_LEN).contains(&n) {
            return Err(CryptoError::InvalidKey(format!(
                "permutation length {n} outside {MIN_BLOCK_LEN}..={MAX_BLOCK_LEN}"
            )));
        }

        let mut seen = vec![false; n];
        let mut forward = Vec::with_capacity(n);
        for c in digits.chars() {
            let index = c
                .to_digit(10)
                .map(|d| d as usize)
                .filter(|&d| d < n)
                .ok_or_else(|| {
                    CryptoError::InvalidKey(format!("{c:?} is not a digit below {n}"))
                })?;
            if std::mem::replace(&mut seen[index], true) {
                return Err(CryptoError::InvalidKey(format!("digit {index} repeated")));
            }
            forward.push(index);
        }
        Ok(Self { forward })
    }

    /// Block length `N`.
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.forward.len()
    }

    /// Key back in digit-string form.
    #[must_use]
    pub fn digits(&self) -> String {
        self.forward
            .iter()
            .filter_map(|&d| char::from_digit(u32::try_from(d).ok()?, 10))
            .collect()
    }

    fn permute(&self, block: &[u8], out: &mut [u8]) {
        for (slot, &source) in out.iter_mut().zip(&self.forward) {
            *slot = block[source];
        }
    }

    fn unpermute(&self, block: &[u8], out: &mut [u8]) {
        for (&byte, &target) in block.iter().zip(&self.forward) {
            out[target] = byte;
        }
    }
}

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Append `1..=N` bytes, each equal to the pad length.
fn pad(data: &mut Vec<u8>, block_len: usize) {
    // block_len is between 2 and 10, so neither step can overflow and the pad
    // byte always fits.
    #[allow(clippy::arithmetic_side_effects)]
    let pad_len = block_len - data.len() % block_len;
    let pad_byte = u8::try_from(pad_len).unwrap_or(u8::MAX);
    data.resize(data.len().saturating_add(pad_len), pad_byte);
}

/// Validate and remove the padding from a final decrypted block.
fn unpad(block: &[u8]) -> Result<&[u8], CryptoError> {
    let bad = || CryptoError::Decryption("invalid padding".into());
    let pad_len = usize::from(*block.last().ok_or_else(bad)?);
    if pad_len == 0 || pad_len > block.len() {
        return Err(bad());
    }
    let (body, padding) = block.split_at(block.len().saturating_sub(pad_len));
    if padding.iter().any(|&b| usize::from(b) != pad_len) {
        return Err(bad());
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// One-shot
// ---------------------------------------------------------------------------

/// Pad and transpose `plaintext`. The result is always a non-empty multiple
/// of the block length.
#[must_use]
pub fn encrypt(plaintext: &[u8], key: &PermutationKey) -> Vec<u8> {
    let n = key.block_len();
    let mut padded = plaintext.to_vec();
    pad(&mut padded, n);

    let mut out = vec![0u8; padded.len()];
    for (block, dst) in padded.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
        key.permute(block, dst);
    }
    out
}

/// Undo the transposition and strip the padding.
///
/// # Errors
///
/// Returns `CryptoError::Decryption` if the length is zero or not a multiple
/// of the block length, or the padding is malformed.
pub fn decrypt(ciphertext: &[u8], key: &PermutationKey) -> Result<Vec<u8>, CryptoError> {
    let n = key.block_len();
    check_aligned(ciphertext.len(), n)?;

    let mut out = vec![0u8; ciphertext.len()];
    for (block, dst) in ciphertext.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
        key.unpermute(block, dst);
    }
    let last_start = out.len().saturating_sub(n);
    let body_len = last_start.saturating_add(unpad(&out[last_start..])?.len());
    out.truncate(body_len);
    Ok(out)
}

fn check_aligned(len: usize, block_len: usize) -> Result<(), CryptoError> {
    if len == 0 || len.checked_rem(block_len) != Some(0) {
        return Err(CryptoError::Decryption(format!(
            "ciphertext length {len} is not a positive multiple of {block_len}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Stream variant of [`encrypt`]. Returns the number of bytes written.
///
/// # Errors
///
/// Returns `CryptoError::Io` on reader/writer failure.
pub fn encrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &PermutationKey,
) -> Result<u64, CryptoError> {
    let n = key.block_len();
    let mut buf = vec![0u8; n.saturating_mul(BLOCKS_PER_CHUNK)];
    let mut out = vec![0u8; buf.len()];
    let mut written = 0u64;

    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == buf.len() {
            for (block, dst) in buf.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
                key.permute(block, dst);
            }
            writer.write_all(&out[..filled])?;
            written = written.saturating_add(as_u64(filled));
            continue;
        }

        // Short read: end of input, pad what is left.
        let encrypted = encrypt(&buf[..filled], key);
        writer.write_all(&encrypted)?;
        written = written.saturating_add(as_u64(encrypted.len()));
        break;
    }
    writer.flush()?;
    Ok(written)
}

/// Stream variant of [`decrypt`]. The last block is held back until end of
/// input so its padding can be checked. Returns the number of bytes written.
///
/// # Errors
///
/// Returns `CryptoError::Decryption` for misaligned or empty input and bad
/// padding, `CryptoError::Io` on reader/writer failure.
pub fn decrypt_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &PermutationKey,
) -> Result<u64, CryptoError> {
    let n = key.block_len();
    let mut buf = vec![0u8; n.saturating_mul(BLOCKS_PER_CHUNK)];
    let mut out = vec![0u8; buf.len()];
    let mut held: Option<Vec<u8>> = None;
    let mut total_read = 0usize;
    let mut written = 0u64;

    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        total_read = total_read.saturating_add(filled);
        if filled == 0 {
            break;
        }
        if filled.checked_rem(n) != Some(0) {
            return Err(CryptoError::Decryption(format!(
                "ciphertext length {total_read} is not a multiple of {n}"
            )));
        }

        for (block, dst) in buf[..filled].chunks_exact(n).zip(out.chunks_exact_mut(n)) {
            key.unpermute(block, dst);
        }
        if let Some(previous) = held.take() {
            writer.write_all(&previous)?;
            written = written.saturating_add(as_u64(previous.len()));
        }
        let keep_from = filled.saturating_sub(n);
        writer.write_all(&out[..keep_from])?;
        written = written.saturating_add(as_u64(keep_from));
        held = Some(out[keep_from..filled].to_vec());

        if filled < buf.len() {
            break;
        }
    }

    let last = held.ok_or_else(|| CryptoError::Decryption("empty ciphertext".into()))?;
    let body = unpad(&last)?;
    writer.write_all(body)?;
    written = written.saturating_add(as_u64(body.len()));
    writer.flush()?;
    Ok(written)
}
