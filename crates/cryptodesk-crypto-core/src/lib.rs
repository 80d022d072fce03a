//! `cryptodesk-crypto-core`: cipher engines for CryptoDesk.
//!
//! Pure computation over byte slices and `Read`/`Write` streams: no file
//! paths, no logging, no configuration. The facade crate owns those.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod hex;

pub mod bignum;

pub mod rsa;

pub mod gost;

pub mod permutation;

pub mod identity;

mod stream;

pub use error::CryptoError;
pub use gost::{Gost28147, GostCfb, GostIv, GostKey};
pub use permutation::PermutationKey;
pub use rsa::{
    generate_key_pair, generate_key_pair_with, KeyGenParams, KeyPairHex, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS,
};
