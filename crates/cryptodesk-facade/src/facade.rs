//! Caller-facing operations: one method per screen action, plus generic
//! dispatch on [`CipherKey`].
//!
//! Text results are hex (RSA, permutation), the `IVHEX:CIPHERTEXTHEX`
//! envelope (GOST) or shifted text (identity). Decrypt paths trim pasted
//! whitespace before decoding and require the recovered bytes to be UTF-8.

use std::path::Path;
use std::time::Instant;

use cryptodesk_crypto_core::{
    gost, hex, identity, permutation, rsa, CryptoError, GostIv, GostKey, KeyGenParams, KeyPairHex,
    PermutationKey, RsaPrivateKey, RsaPublicKey,
};

use crate::algorithm::{Algorithm, CipherKey};
use crate::envelope;
use crate::error::EngineError;
use crate::files::{transform_file, Direction, FileReport};
use crate::settings::EngineSettings;

/// RSA keys below this size get a warning in the log.
const WEAK_RSA_BITS: u32 = 1024;

/// Stateless entry point holding only immutable settings.
#[derive(Debug, Clone, Default)]
pub struct CryptoFacade {
    settings: EngineSettings,
}

impl CryptoFacade {
    /// Facade with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Facade with caller-supplied settings.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Settings` if a setting is out of range.
    pub fn with_settings(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ── RSA ────────────────────────────────────────────────────────

    /// Generate an RSA key pair with a `bits`-bit modulus.
    ///
    /// # Errors
    ///
    /// Returns `KeyGeneration` if `bits` is outside the supported range.
    pub fn rsa_generate_key_pair(&self, bits: u32) -> Result<KeyPairHex, EngineError> {
        if bits < WEAK_RSA_BITS {
            tracing::warn!(bits, "RSA key below {WEAK_RSA_BITS} bits requested, demonstration use only");
        }
        let started = Instant::now();
        let pair = rsa::generate_key_pair_with(&KeyGenParams {
            bits,
            mr_rounds: self.settings.miller_rabin_rounds,
            ..KeyGenParams::default()
        })?;
        tracing::debug!(
            bits,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "RSA key pair generated"
        );
        Ok(pair.to_hex())
    }

    /// Generate an RSA key pair of the configured default size.
    ///
    /// # Errors
    ///
    /// Same as [`Self::rsa_generate_key_pair`].
    pub fn rsa_generate_default_key_pair(&self) -> Result<KeyPairHex, EngineError> {
        self.rsa_generate_key_pair(self.settings.default_rsa_bits)
    }

    /// Encrypt UTF-8 text under `(n, e)`; returns ciphertext hex.
    ///
    /// # Errors
    ///
    /// `Format`/`InvalidKey` for bad key hex, `Encryption` if the modulus
    /// is too small to carry data.
    pub fn rsa_encrypt_text(
        &self,
        plaintext: &str,
        n_hex: &str,
        e_hex: &str,
    ) -> Result<String, EngineError> {
        let key = rsa_public(n_hex, e_hex)?;
        Ok(hex::encode(&rsa::encrypt(plaintext.as_bytes(), &key)?))
    }

    /// Decrypt ciphertext hex under `(n, d)`.
    ///
    /// # Errors
    ///
    /// `Format` for bad hex or misaligned ciphertext, `Decryption` for a
    /// wrong key or non-UTF-8 result.
    pub fn rsa_decrypt_text(
        &self,
        ciphertext_hex: &str,
        n_hex: &str,
        d_hex: &str,
    ) -> Result<String, EngineError> {
        let key = rsa_private(n_hex, d_hex)?;
        let ciphertext = hex::decode(ciphertext_hex.trim())?;
        utf8(rsa::decrypt(&ciphertext, &key)?)
    }

    /// Encrypt a file under `(n, e)`.
    ///
    /// # Errors
    ///
    /// As [`Self::rsa_encrypt_text`], plus `Io` for filesystem failures.
    pub fn rsa_encrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        n_hex: &str,
        e_hex: &str,
    ) -> Result<FileReport, EngineError> {
        let key = rsa_public(n_hex, e_hex)?;
        self.run_file(src, dst, Algorithm::Rsa, Direction::Encrypt, |r, w| {
            rsa::encrypt_stream(r, w, &key).map(|_| None)
        })
    }

    /// Decrypt a file under `(n, d)`.
    ///
    /// # Errors
    ///
    /// `Format` for a truncated file, `Decryption` for a wrong key, `Io`
    /// for filesystem failures.
    pub fn rsa_decrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        n_hex: &str,
        d_hex: &str,
    ) -> Result<FileReport, EngineError> {
        let key = rsa_private(n_hex, d_hex)?;
        self.run_file(src, dst, Algorithm::Rsa, Direction::Decrypt, |r, w| {
            rsa::decrypt_stream(r, w, &key).map(|_| None)
        })
    }

    // ── GOST ───────────────────────────────────────────────────────

    /// Fresh random 256-bit key as 64 hex characters.
    ///
    /// # Errors
    ///
    /// `KeyGeneration` if the OS CSPRNG fails.
    pub fn gost_generate_key_hex(&self) -> Result<String, EngineError> {
        Ok(GostKey::generate()?.to_hex())
    }

    /// Fresh random 64-bit IV as 16 hex characters.
    ///
    /// # Errors
    ///
    /// `KeyGeneration` if the OS CSPRNG fails.
    pub fn gost_generate_iv_hex(&self) -> Result<String, EngineError> {
        Ok(GostIv::generate()?.to_hex())
    }

    /// Encrypt text; returns `IVHEX:CIPHERTEXTHEX`. A missing or blank
    /// `iv_hex` selects a random IV.
    ///
    /// # Errors
    ///
    /// `KeyLength`/`IvLength`/`Format` for malformed key or IV hex.
    pub fn gost_encrypt_text(
        &self,
        plaintext: &str,
        key_hex: &str,
        iv_hex: Option<&str>,
    ) -> Result<String, EngineError> {
        let key = GostKey::from_hex(key_hex.trim())?;
        let iv = optional_iv(iv_hex)?;
        let (iv, ciphertext) = gost::encrypt(plaintext.as_bytes(), &key, iv.as_ref())?;
        Ok(envelope::seal(&iv, &ciphertext))
    }

    /// Decrypt an `IVHEX:CIPHERTEXTHEX` envelope.
    ///
    /// # Errors
    ///
    /// `Format` for a malformed envelope, `KeyLength`/`IvLength` for wrong
    /// sizes, `Decryption` if the result is not UTF-8.
    pub fn gost_decrypt_text(&self, envelope: &str, key_hex: &str) -> Result<String, EngineError> {
        let key = GostKey::from_hex(key_hex.trim())?;
        let (iv, ciphertext) = envelope::open(envelope)?;
        utf8(gost::decrypt(&ciphertext, &key, &iv))
    }

    /// Encrypt a file; the output starts with the 8 IV bytes.
    ///
    /// # Errors
    ///
    /// As [`Self::gost_encrypt_text`], plus `Io` for filesystem failures.
    pub fn gost_encrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        key_hex: &str,
        iv_hex: Option<&str>,
    ) -> Result<FileReport, EngineError> {
        let key = GostKey::from_hex(key_hex.trim())?;
        let iv = optional_iv(iv_hex)?;
        self.run_file(src, dst, Algorithm::Gost, Direction::Encrypt, |r, w| {
            gost::encrypt_stream(r, w, &key, iv.as_ref()).map(|(iv, _)| Some(iv))
        })
    }

    /// Decrypt a file whose first 8 bytes are the IV.
    ///
    /// # Errors
    ///
    /// `Format` if the file is shorter than an IV, `KeyLength` for a bad
    /// key, `Io` for filesystem failures.
    pub fn gost_decrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        key_hex: &str,
    ) -> Result<FileReport, EngineError> {
        let key = GostKey::from_hex(key_hex.trim())?;
        self.run_file(src, dst, Algorithm::Gost, Direction::Decrypt, |r, w| {
            gost::decrypt_stream(r, w, &key).map(|(iv, _)| Some(iv))
        })
    }

    // ── Permutation ────────────────────────────────────────────────

    /// Encrypt text; returns ciphertext hex.
    ///
    /// # Errors
    ///
    /// `InvalidKey` unless `digits` is a permutation of `0..N`.
    pub fn permutation_encrypt_text(&self, text: &str, digits: &str) -> Result<String, EngineError> {
        let key = PermutationKey::parse(digits.trim())?;
        Ok(hex::encode(&permutation::encrypt(text.as_bytes(), &key)))
    }

    /// Decrypt ciphertext hex.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a bad key, `Format` for bad hex, `Decryption` for
    /// misaligned input, bad padding or non-UTF-8 output.
    pub fn permutation_decrypt_text(
        &self,
        ciphertext_hex: &str,
        digits: &str,
    ) -> Result<String, EngineError> {
        let key = PermutationKey::parse(digits.trim())?;
        let ciphertext = hex::decode(ciphertext_hex.trim())?;
        utf8(permutation::decrypt(&ciphertext, &key)?)
    }

    /// Encrypt a file.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a bad key, `Io` for filesystem failures.
    pub fn permutation_encrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        digits: &str,
    ) -> Result<FileReport, EngineError> {
        let key = PermutationKey::parse(digits.trim())?;
        self.run_file(src, dst, Algorithm::Permutation, Direction::Encrypt, |r, w| {
            permutation::encrypt_stream(r, w, &key).map(|_| None)
        })
    }

    /// Decrypt a file.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a bad key, `Decryption` for misaligned input or bad
    /// padding, `Io` for filesystem failures.
    pub fn permutation_decrypt_file(
        &self,
        src: &Path,
        dst: &Path,
        digits: &str,
    ) -> Result<FileReport, EngineError> {
        let key = PermutationKey::parse(digits.trim())?;
        self.run_file(src, dst, Algorithm::Permutation, Direction::Decrypt, |r, w| {
            permutation::decrypt_stream(r, w, &key).map(|_| None)
        })
    }

    // ── Identity ───────────────────────────────────────────────────

    /// Rotate printable ASCII forward by one.
    #[must_use]
    pub fn identity_encrypt_text(&self, text: &str) -> String {
        identity::shift_text(text)
    }

    /// Inverse of [`Self::identity_encrypt_text`].
    #[must_use]
    pub fn identity_decrypt_text(&self, text: &str) -> String {
        identity::unshift_text(text)
    }

    /// Add one to every byte of a file.
    ///
    /// # Errors
    ///
    /// `Io` for filesystem failures.
    pub fn identity_encrypt_file(&self, src: &Path, dst: &Path) -> Result<FileReport, EngineError> {
        self.run_file(src, dst, Algorithm::Identity, Direction::Encrypt, |r, w| {
            identity::shift_stream(r, w).map(|_| None)
        })
    }

    /// Subtract one from every byte of a file.
    ///
    /// # Errors
    ///
    /// `Io` for filesystem failures.
    pub fn identity_decrypt_file(&self, src: &Path, dst: &Path) -> Result<FileReport, EngineError> {
        self.run_file(src, dst, Algorithm::Identity, Direction::Decrypt, |r, w| {
            identity::unshift_stream(r, w).map(|_| None)
        })
    }

    // ── Generic dispatch ───────────────────────────────────────────

    /// Encrypt text with whichever algorithm `key` selects.
    ///
    /// # Errors
    ///
    /// As the matching `*_encrypt_text` method.
    pub fn encrypt_text(&self, key: &CipherKey, plaintext: &str) -> Result<String, EngineError> {
        match key {
            CipherKey::Rsa {
                modulus_hex,
                exponent_hex,
            } => self.rsa_encrypt_text(plaintext, modulus_hex, exponent_hex),
            CipherKey::Gost { key_hex, iv_hex } => {
                self.gost_encrypt_text(plaintext, key_hex, iv_hex.as_deref())
            }
            CipherKey::Permutation { digits } => self.permutation_encrypt_text(plaintext, digits),
            CipherKey::Identity => Ok(self.identity_encrypt_text(plaintext)),
        }
    }

    /// Decrypt text with whichever algorithm `key` selects.
    ///
    /// # Errors
    ///
    /// As the matching `*_decrypt_text` method.
    pub fn decrypt_text(&self, key: &CipherKey, ciphertext: &str) -> Result<String, EngineError> {
        match key {
            CipherKey::Rsa {
                modulus_hex,
                exponent_hex,
            } => self.rsa_decrypt_text(ciphertext, modulus_hex, exponent_hex),
            CipherKey::Gost { key_hex, .. } => self.gost_decrypt_text(ciphertext, key_hex),
            CipherKey::Permutation { digits } => self.permutation_decrypt_text(ciphertext, digits),
            CipherKey::Identity => Ok(self.identity_decrypt_text(ciphertext)),
        }
    }

    /// Encrypt a file with whichever algorithm `key` selects.
    ///
    /// # Errors
    ///
    /// As the matching `*_encrypt_file` method.
    pub fn encrypt_file(
        &self,
        key: &CipherKey,
        src: &Path,
        dst: &Path,
    ) -> Result<FileReport, EngineError> {
        match key {
            CipherKey::Rsa {
                modulus_hex,
                exponent_hex,
            } => self.rsa_encrypt_file(src, dst, modulus_hex, exponent_hex),
            CipherKey::Gost { key_hex, iv_hex } => {
                self.gost_encrypt_file(src, dst, key_hex, iv_hex.as_deref())
            }
            CipherKey::Permutation { digits } => self.permutation_encrypt_file(src, dst, digits),
            CipherKey::Identity => self.identity_encrypt_file(src, dst),
        }
    }

    /// Decrypt a file with whichever algorithm `key` selects.
    ///
    /// # Errors
    ///
    /// As the matching `*_decrypt_file` method.
    pub fn decrypt_file(
        &self,
        key: &CipherKey,
        src: &Path,
        dst: &Path,
    ) -> Result<FileReport, EngineError> {
        match key {
            CipherKey::Rsa {
                modulus_hex,
                exponent_hex,
            } => self.rsa_decrypt_file(src, dst, modulus_hex, exponent_hex),
            CipherKey::Gost { key_hex, .. } => self.gost_decrypt_file(src, dst, key_hex),
            CipherKey::Permutation { digits } => self.permutation_decrypt_file(src, dst, digits),
            CipherKey::Identity => self.identity_decrypt_file(src, dst),
        }
    }

    fn run_file<F>(
        &self,
        src: &Path,
        dst: &Path,
        algorithm: Algorithm,
        direction: Direction,
        engine: F,
    ) -> Result<FileReport, EngineError>
    where
        F: FnOnce(
            &mut dyn std::io::Read,
            &mut dyn std::io::Write,
        ) -> Result<Option<GostIv>, CryptoError>,
    {
        transform_file(
            src,
            dst,
            self.settings.io_buffer_size,
            algorithm,
            direction,
            engine,
        )
    }
}

// ── Key parsing ────────────────────────────────────────────────────

fn rsa_public(n_hex: &str, e_hex: &str) -> Result<RsaPublicKey, CryptoError> {
    RsaPublicKey::from_hex(n_hex.trim(), e_hex.trim())
}

fn rsa_private(n_hex: &str, d_hex: &str) -> Result<RsaPrivateKey, CryptoError> {
    RsaPrivateKey::from_hex(n_hex.trim(), d_hex.trim())
}

fn optional_iv(iv_hex: Option<&str>) -> Result<Option<GostIv>, CryptoError> {
    iv_hex
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(GostIv::from_hex)
        .transpose()
}

fn utf8(bytes: Vec<u8>) -> Result<String, EngineError> {
    String::from_utf8(bytes).map_err(|e| {
        CryptoError::Decryption(format!(
            "decrypted data is not UTF-8 text (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ZERO_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const ZERO_IV: &str = "0000000000000000";

    fn facade() -> CryptoFacade {
        CryptoFacade::new()
    }

    #[test]
    fn gost_zero_key_zero_iv_scenario() {
        let f = facade();
        let envelope = f.gost_encrypt_text("TEST", ZERO_KEY, Some(ZERO_IV)).unwrap();
        let (iv, ct) = envelope.split_once(':').unwrap();
        assert_eq!(iv, ZERO_IV);
        assert_eq!(ct.len(), 8);
        assert_eq!(f.gost_decrypt_text(&envelope, ZERO_KEY).unwrap(), "TEST");
    }

    #[test]
    fn gost_blank_iv_generates_one() {
        let f = facade();
        let a = f.gost_encrypt_text("same", ZERO_KEY, Some("  ")).unwrap();
        let b = f.gost_encrypt_text("same", ZERO_KEY, None).unwrap();
        assert_ne!(a, b);
        assert_eq!(f.gost_decrypt_text(&a, ZERO_KEY).unwrap(), "same");
        assert_eq!(f.gost_decrypt_text(&b, ZERO_KEY).unwrap(), "same");
    }

    #[test]
    fn gost_key_and_iv_length_kinds() {
        let f = facade();
        let err = f.gost_encrypt_text("x", "00", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyLength);
        let err = f.gost_encrypt_text("x", ZERO_KEY, Some("00")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IvLength);
    }

    #[test]
    fn gost_generated_hex_lengths() {
        let f = facade();
        assert_eq!(f.gost_generate_key_hex().unwrap().len(), 64);
        assert_eq!(f.gost_generate_iv_hex().unwrap().len(), 16);
    }

    #[test]
    fn permutation_invalid_key_kind() {
        let err = facade().permutation_encrypt_text("abc", "112").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKey);
    }

    #[test]
    fn permutation_text_roundtrip() {
        let f = facade();
        let ct = f.permutation_encrypt_text("Hello, world", "201").unwrap();
        assert_eq!(f.permutation_decrypt_text(&ct, "201").unwrap(), "Hello, world");
    }

    #[test]
    fn rsa_text_roundtrip_with_generated_key() {
        let f = facade();
        let pair = f.rsa_generate_key_pair(256).unwrap();
        let ct = f
            .rsa_encrypt_text("hello RSA", &pair.modulus, &pair.public_exponent)
            .unwrap();
        let pt = f
            .rsa_decrypt_text(&format!(" {ct}\n"), &pair.modulus, &pair.private_exponent)
            .unwrap();
        assert_eq!(pt, "hello RSA");
    }

    #[test]
    fn rsa_tiny_modulus_is_encryption_error() {
        let err = facade().rsa_encrypt_text("A", "ca1", "11").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encryption);
    }

    #[test]
    fn rsa_out_of_range_bits_is_key_generation_error() {
        let err = facade().rsa_generate_key_pair(8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyGeneration);
    }

    #[test]
    fn default_key_pair_uses_settings() {
        let f = CryptoFacade::with_settings(EngineSettings {
            default_rsa_bits: 128,
            ..EngineSettings::default()
        })
        .unwrap();
        let pair = f.rsa_generate_default_key_pair().unwrap();
        let (public, _) = pair.parse().unwrap();
        assert_eq!(public.modulus().bits(), 128);
    }

    #[test]
    fn with_settings_validates() {
        let err = CryptoFacade::with_settings(EngineSettings {
            io_buffer_size: 0,
            ..EngineSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Settings);
    }

    #[test]
    fn identity_text_roundtrip() {
        let f = facade();
        let shifted = f.identity_encrypt_text("abc~");
        assert_eq!(shifted, "bcd ");
        assert_eq!(f.identity_decrypt_text(&shifted), "abc~");
    }

    #[test]
    fn generic_dispatch_matches_named_operations() {
        let f = facade();
        let keys = [
            CipherKey::Gost {
                key_hex: ZERO_KEY.into(),
                iv_hex: Some(ZERO_IV.into()),
            },
            CipherKey::Permutation {
                digits: "3012".into(),
            },
            CipherKey::Identity,
        ];
        for key in &keys {
            let ct = f.encrypt_text(key, "dispatch me").unwrap();
            assert_eq!(f.decrypt_text(key, &ct).unwrap(), "dispatch me", "{key:?}");
        }
        assert_eq!(
            f.encrypt_text(&keys[0], "TEST").unwrap(),
            f.gost_encrypt_text("TEST", ZERO_KEY, Some(ZERO_IV)).unwrap()
        );
    }

    #[test]
    fn non_utf8_plaintext_is_decryption_error() {
        let f = facade();
        // Identity permutation: 0xFF survives as-is and is not UTF-8.
        let ct = hex::encode(&permutation::encrypt(&[0xFF], &PermutationKey::parse("01").unwrap()));
        let err = f.permutation_decrypt_text(&ct, "01").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decryption);
    }
}
