//! `cryptodesk-facade`: caller-facing API for CryptoDesk.
//!
//! Parses hex key material, dispatches to the engines in
//! `cryptodesk-crypto-core`, builds the text and file envelopes, and writes
//! file output all-or-nothing. Logging goes through `tracing`; installing a
//! subscriber is the application's job.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod algorithm;
pub mod envelope;
pub mod error;
pub mod facade;
pub mod files;
pub mod settings;

pub use algorithm::{Algorithm, CipherKey};
pub use cryptodesk_crypto_core::KeyPairHex;
pub use error::{EngineError, ErrorKind};
pub use facade::CryptoFacade;
pub use files::FileReport;
pub use settings::EngineSettings;
