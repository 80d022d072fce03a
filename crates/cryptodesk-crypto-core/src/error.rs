//! Cryptographic error types for `cryptodesk-crypto-core`.

use thiserror::Error;

/// Errors produced by the cipher engines.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Symmetric key has the wrong size (GOST keys are exactly 32 bytes).
    #[error("invalid key length: {0}")]
    KeyLength(String),

    /// Initialization vector has the wrong size (GOST IVs are exactly 8 bytes).
    #[error("invalid IV length: {0}")]
    IvLength(String),

    /// Malformed key material: non-permutation digit string, zero modulus or exponent.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Hex decoding failure or envelope without a recoverable IV.
    #[error("format error: {0}")]
    Format(String),

    /// RSA key generation failure (bit length out of range, degenerate primes).
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Plaintext cannot be encrypted under the given key.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Ciphertext is not invertible under the given key (wrong key, foreign data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Read/write failure in a stream variant.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
