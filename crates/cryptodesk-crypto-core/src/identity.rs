//! Demonstration transform with no security value.
//!
//! Bytes are shifted by one (wrapping). Text rotates printable ASCII
//! (`' '..='~'`) by one position inside that range and leaves every other
//! character alone, so `unshift_text(shift_text(s)) == s` for any string.

use std::io::{Read, Write};

use crate::error::CryptoError;
use crate::stream::{as_u64, read_full};

const PRINTABLE_FIRST: u8 = b' ';
const PRINTABLE_LAST: u8 = b'~';
const STREAM_CHUNK_LEN: usize = 8 * 1024;

/// Add one to every byte, wrapping `0xFF` to `0x00`.
#[must_use]
pub fn shift_bytes(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b.wrapping_add(1)).collect()
}

/// Inverse of [`shift_bytes`].
#[must_use]
pub fn unshift_bytes(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b.wrapping_sub(1)).collect()
}

/// Rotate printable ASCII forward by one (`'~'` becomes `' '`).
#[must_use]
pub fn shift_text(text: &str) -> String {
    text.chars().map(rotate_forward).collect()
}

/// Inverse of [`shift_text`].
#[must_use]
pub fn unshift_text(text: &str) -> String {
    text.chars().map(rotate_backward).collect()
}

fn rotate_forward(c: char) -> char {
    match u8::try_from(c) {
        Ok(PRINTABLE_LAST) => char::from(PRINTABLE_FIRST),
        Ok(b @ PRINTABLE_FIRST..=0x7D) => char::from(b.wrapping_add(1)),
        _ => c,
    }
}

fn rotate_backward(c: char) -> char {
    match u8::try_from(c) {
        Ok(PRINTABLE_FIRST) => char::from(PRINTABLE_LAST),
        Ok(b @ 0x21..=PRINTABLE_LAST) => char::from(b.wrapping_sub(1)),
        _ => c,
    }
}

/// Stream variant of [`shift_bytes`]. Returns the number of bytes written.
///
/// # Errors
///
/// Returns `CryptoError::Io` on reader/writer failure.
pub fn shift_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<u64, CryptoError> {
    map_stream(reader, writer, |b| b.wrapping_add(1))
}

/// Stream variant of [`unshift_bytes`].
///
/// # Errors
///
/// Returns `CryptoError::Io` on reader/writer failure.
pub fn unshift_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<u64, CryptoError> {
    map_stream(reader, writer, |b| b.wrapping_sub(1))
}

fn map_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    f: impl Fn(u8) -> u8,
) -> Result<u64, CryptoError> {
    let mut buf = vec![0u8; STREAM_CHUNK_LEN];
    let mut written = 0u64;
    loop {
        let filled = read_full(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        for b in &mut buf[..filled] {
            *b = f(*b);
        }
        writer.write_all(&buf[..filled])?;
        written = written.saturating_add(as_u64(filled));
    }
    writer.flush()?;
    Ok(written)
}
