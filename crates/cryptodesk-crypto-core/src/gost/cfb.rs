//! CFB-64 ("gamming with feedback") over [`Gost28147`].
//!
//! `gamma_1 = E(IV)`, `c_i = p_i ^ gamma_i`, `gamma_{i+1} = E(c_i)`.
//! State advances per byte, so splitting the input into arbitrary chunks
//! produces exactly the same output as one call over the whole input.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Gost28147, GostIv, GostKey, BLOCK_LEN};

/// Incremental CFB encryptor/decryptor.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct GostCfb {
    cipher: Gost28147,
    /// Feedback register: the IV, then the most recent ciphertext block.
    register: [u8; BLOCK_LEN],
    gamma: [u8; BLOCK_LEN],
    /// Bytes of `gamma` already consumed.
    used: usize,
}

impl GostCfb {
    /// Start a keystream for `key` and `iv`.
    #[must_use]
    pub fn new(key: &GostKey, iv: &GostIv) -> Self {
        Self {
            cipher: Gost28147::new(key),
            register: *iv.as_bytes(),
            gamma: [0u8; BLOCK_LEN],
            used: BLOCK_LEN,
        }
    }

    /// Encrypt `data` in place, continuing from the previous call.
    pub fn encrypt_in_place(&mut self, data: &mut [u8]) {
        for byte in data {
            let k = self.next_gamma_index();
            let c = *byte ^ self.gamma[k];
            self.register[k] = c;
            *byte = c;
        }
    }

    /// Decrypt `data` in place, continuing from the previous call.
    pub fn decrypt_in_place(&mut self, data: &mut [u8]) {
        for byte in data {
            let k = self.next_gamma_index();
            let c = *byte;
            self.register[k] = c;
            *byte = c ^ self.gamma[k];
        }
    }

    /// Index of the next gamma byte, refilling from the register after each
    /// full block.
    fn next_gamma_index(&mut self) -> usize {
        if self.used == BLOCK_LEN {
            self.gamma = self.cipher.encrypt_block(self.register);
            self.used = 0;
        }
        let index = self.used;
        self.used = self.used.saturating_add(1);
        index
    }
}

impl std::fmt::Debug for GostCfb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GostCfb(***)")
    }
}
