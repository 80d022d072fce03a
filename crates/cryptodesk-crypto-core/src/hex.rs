//! Hexadecimal text encoding of raw bytes.
//!
//! Encoding is always lower-case. Decoding accepts either case and is
//! strict about everything else: odd lengths and non-hex characters are
//! [`CryptoError::Format`] errors.

use crate::error::CryptoError;
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};

/// Encode bytes as lower-case hex, two characters per byte.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    HEXLOWER.encode(bytes)
}

/// Decode a hex string (either case) into bytes.
///
/// # Errors
///
/// Returns `CryptoError::Format` if the length is odd or a character is
/// outside `[0-9a-fA-F]`.
pub fn decode(hex: &str) -> Result<Vec<u8>, CryptoError> {
    HEXLOWER_PERMISSIVE
        .decode(hex.as_bytes())
        .map_err(|e| CryptoError::Format(format!("invalid hex string: {e}")))
}

/// Decode a hex string into a fixed-size array.
///
/// # Errors
///
/// Returns `CryptoError::Format` if the string is not valid hex or does not
/// decode to exactly `N` bytes.
pub fn decode_exact<const N: usize>(hex: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode(hex)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::Format(format!(
            "hex string decodes to {} bytes (expected {N})",
            bytes.len()
        ))
    })
}
