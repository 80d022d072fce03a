//! Algorithm tags and the key material a request carries.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cipher selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    Rsa,
    Gost,
    Permutation,
    Identity,
}

impl Algorithm {
    /// Every selectable algorithm, in menu order.
    pub const ALL: [Self; 4] = [Self::Rsa, Self::Gost, Self::Permutation, Self::Identity];

    /// Short lower-case name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Gost => "gost",
            Self::Permutation => "permutation",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key material for one request, as the caller typed or pasted it.
///
/// RSA takes `(n, e)` to encrypt and `(n, d)` to decrypt, so
/// `exponent_hex` is whichever the direction needs. A blank or absent
/// `iv_hex` on GOST encryption asks for a fresh random IV; GOST decryption
/// takes the IV from the envelope and ignores this field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(tag = "algorithm", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CipherKey {
    Rsa {
        modulus_hex: String,
        exponent_hex: String,
    },
    Gost {
        key_hex: String,
        #[serde(default)]
        iv_hex: Option<String>,
    },
    Permutation {
        digits: String,
    },
    Identity,
}

impl CipherKey {
    /// Algorithm this key belongs to.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Rsa { .. } => Algorithm::Rsa,
            Self::Gost { .. } => Algorithm::Gost,
            Self::Permutation { .. } => Algorithm::Permutation,
            Self::Identity => Algorithm::Identity,
        }
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa { modulus_hex, .. } => f
                .debug_struct("Rsa")
                .field("modulus_hex", modulus_hex)
                .field("exponent_hex", &"***")
                .finish(),
            Self::Gost { iv_hex, .. } => f
                .debug_struct("Gost")
                .field("key_hex", &"***")
                .field("iv_hex", iv_hex)
                .finish(),
            Self::Permutation { .. } => f
                .debug_struct("Permutation")
                .field("digits", &"***")
                .finish(),
            Self::Identity => f.write_str("Identity"),
        }
    }
}
