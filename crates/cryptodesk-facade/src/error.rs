//! Facade error types for `cryptodesk-facade`.

use std::path::PathBuf;

use cryptodesk_crypto_core::CryptoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by facade operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Cipher operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Opening, creating or replacing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file the operation was working on.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Engine settings are out of range or could not be persisted.
    #[error("settings error: {0}")]
    Settings(String),
}

/// Stable, serializable failure category for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    KeyLength,
    IvLength,
    InvalidKey,
    Format,
    KeyGeneration,
    Encryption,
    Decryption,
    Io,
    Settings,
}

impl EngineError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Crypto(e) => match e {
                CryptoError::KeyLength(_) => ErrorKind::KeyLength,
                CryptoError::IvLength(_) => ErrorKind::IvLength,
                CryptoError::InvalidKey(_) => ErrorKind::InvalidKey,
                CryptoError::Format(_) => ErrorKind::Format,
                CryptoError::KeyGeneration(_) => ErrorKind::KeyGeneration,
                CryptoError::Encryption(_) => ErrorKind::Encryption,
                CryptoError::Decryption(_) => ErrorKind::Decryption,
                CryptoError::Io(_) => ErrorKind::Io,
            },
            Self::Io { .. } => ErrorKind::Io,
            Self::Settings(_) => ErrorKind::Settings,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
