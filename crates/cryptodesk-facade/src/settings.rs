//! Engine tuning knobs, stored as plain JSON in a caller-chosen directory.
//!
//! Nothing here is secret: key material never touches the settings file.

use std::fs;
use std::path::Path;

use cryptodesk_crypto_core::rsa::{DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
use cryptodesk_crypto_core::bignum::DEFAULT_MR_ROUNDS;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Upper bound for Miller-Rabin rounds.
pub const MAX_MR_ROUNDS: u32 = 128;

/// Smallest accepted file buffer.
pub const MIN_IO_BUFFER: usize = 512;

/// Largest accepted file buffer (16 MiB).
pub const MAX_IO_BUFFER: usize = 16 * 1024 * 1024;

const SETTINGS_FILE: &str = "engine-settings.json";

// ── Settings ───────────────────────────────────────────────────────

/// Engine settings.
///
/// Persisted to `{data_dir}/engine-settings.json`. All fields have
/// defaults via [`Default`], so partial files load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Modulus size for `rsa_generate_default_key_pair`.
    #[serde(default = "default_rsa_bits")]
    pub default_rsa_bits: u32,

    /// Miller-Rabin rounds per prime candidate during key generation.
    #[serde(default = "default_mr_rounds")]
    pub miller_rabin_rounds: u32,

    /// Capacity of the buffered reader and writer used for file transforms.
    #[serde(default = "default_io_buffer_size")]
    pub io_buffer_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_rsa_bits: default_rsa_bits(),
            miller_rabin_rounds: default_mr_rounds(),
            io_buffer_size: default_io_buffer_size(),
        }
    }
}

const fn default_rsa_bits() -> u32 {
    DEFAULT_KEY_BITS
}
const fn default_mr_rounds() -> u32 {
    DEFAULT_MR_ROUNDS
}
const fn default_io_buffer_size() -> usize {
    65_536
}

impl EngineSettings {
    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Settings` naming the first offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&self.default_rsa_bits) {
            return Err(EngineError::Settings(format!(
                "defaultRsaBits {} outside {MIN_KEY_BITS}..={MAX_KEY_BITS}",
                self.default_rsa_bits
            )));
        }
        if !(1..=MAX_MR_ROUNDS).contains(&self.miller_rabin_rounds) {
            return Err(EngineError::Settings(format!(
                "millerRabinRounds {} outside 1..={MAX_MR_ROUNDS}",
                self.miller_rabin_rounds
            )));
        }
        if !(MIN_IO_BUFFER..=MAX_IO_BUFFER).contains(&self.io_buffer_size) {
            return Err(EngineError::Settings(format!(
                "ioBufferSize {} outside {MIN_IO_BUFFER}..={MAX_IO_BUFFER}",
                self.io_buffer_size
            )));
        }
        Ok(())
    }

    // ── File I/O ───────────────────────────────────────────────────

    /// Load settings from `{data_dir}/engine-settings.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON (corrupt-file recovery). Values are not
    /// range-checked here; see [`Self::validate`].
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| serde_json::from_str(&contents).unwrap_or_default(),
        )
    }

    /// Persist settings to `{data_dir}/engine-settings.json`.
    ///
    /// Writes to a `.tmp` sibling first and renames it into place, so a
    /// crash never leaves a half-written file.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Settings` if serialization fails and
    /// `EngineError::Io` if the directory does not exist or the file
    /// system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> Result<(), EngineError> {
        let path = data_dir.join(SETTINGS_FILE);
        let tmp = data_dir.join(".engine-settings.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::Settings(format!("cannot serialize settings: {e}")))?;

        fs::write(&tmp, &json).map_err(|e| EngineError::io(&tmp, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| EngineError::io(&tmp, e))?;
        }

        fs::rename(&tmp, &path).map_err(|e| EngineError::io(&path, e))?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
