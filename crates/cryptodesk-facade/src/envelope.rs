//! Text envelope for GOST: `IVHEX:CIPHERTEXTHEX`.

use cryptodesk_crypto_core::{hex, CryptoError, GostIv};

const SEPARATOR: char = ':';

/// Join an IV and ciphertext into the text envelope.
#[must_use]
pub fn seal(iv: &GostIv, ciphertext: &[u8]) -> String {
    format!("{}{SEPARATOR}{}", iv.to_hex(), hex::encode(ciphertext))
}

/// Split a text envelope back into IV and ciphertext bytes.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `CryptoError::Format` when the separator is missing or the
/// ciphertext is not hex, and `CryptoError::IvLength` when the IV part is not
/// 16 hex characters.
pub fn open(envelope: &str) -> Result<(GostIv, Vec<u8>), CryptoError> {
    let (iv_hex, ct_hex) = envelope.trim().split_once(SEPARATOR).ok_or_else(|| {
        CryptoError::Format("expected IVHEX:CIPHERTEXTHEX, no ':' found".into())
    })?;
    let iv = GostIv::from_hex(iv_hex.trim())?;
    let ciphertext = hex::decode(ct_hex.trim())?;
    Ok((iv, ciphertext))
}
