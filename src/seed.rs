//! 256-bit seed counter
//!
//! Each worker draws one seed from the OS random source and then walks
//! forward by incrementing it as a big-endian integer. Incrementing is far
//! cheaper than drawing fresh randomness per key, and the random starting
//! point keeps the enumerated keys unpredictable from the outside.

use crate::error::KeyError;
use crate::keys::decode_hex_array;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroize;

pub const SEED_LEN: usize = 32;

/// Big-endian 256-bit counter used as ed25519 key material.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub const fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Fresh seed from the operating system CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        decode_hex_array(hex).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Adds one modulo 2^256. The all-0xff seed wraps to all zeros.
    #[inline(always)]
    pub fn increment(&mut self) {
        for byte in self.0.iter_mut().rev() {
            let (next, carry) = byte.overflowing_add(1);
            *byte = next;
            if !carry {
                return;
            }
        }
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// Seeds are secret material, never print them by accident.
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}
