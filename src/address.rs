//! Yggdrasil-style 128-bit address derivation
//!
//! The public key is bit-inverted and read most-significant bit first. The
//! run of leading ones is stored as a count, the terminating zero is
//! dropped, and the bits that follow are packed into the remaining bytes:
//!
//! ```text
//! byte 0      byte 1        bytes 2..16
//! +------+-------------+------------------------------+
//! | 0x02 | leading ones| bits after the first zero    |
//! +------+-------------+------------------------------+
//! ```

use crate::keys::PublicKey;
use std::fmt;

pub const ADDRESS_LEN: usize = 16;
pub const ADDRESS_PREFIX: u8 = 0x02;
/// Largest leading-ones count the address format can carry.
pub const MAX_ONES: usize = 127;

const KEY_BITS: usize = crate::keys::PUBLIC_KEY_LEN * 8;
const TAIL_OFFSET: usize = 2;
const TAIL_LEN: usize = ADDRESS_LEN - TAIL_OFFSET;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Derive the address for `key`. Pure and total.
    ///
    /// A terminated leading-ones run above [`MAX_ONES`] cannot occur for keys
    /// produced by real derivation; debug builds assert on it. The count is
    /// stored saturated to a byte, so the all-zero key maps to `0x02 0xff`
    /// followed by zeros.
    pub fn for_key(key: &PublicKey) -> Self {
        let mut inverted = [0u8; crate::keys::PUBLIC_KEY_LEN];
        for (dst, src) in inverted.iter_mut().zip(key.as_bytes()) {
            *dst = !src;
        }

        let mut ones = 0usize;
        for byte in &inverted {
            let run = byte.leading_ones() as usize;
            ones += run;
            if run != 8 {
                break;
            }
        }
        // A key whose inverted bits are all ones has no terminating zero and
        // is exempt from the bound.
        debug_assert!(
            ones == KEY_BITS || ones <= MAX_ONES,
            "leading ones count {} exceeds {}",
            ones,
            MAX_ONES
        );

        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1] = ones.min(u8::MAX as usize) as u8;

        // Skip the ones and the zero that ended them; only whole bytes are kept.
        let start = ones + 1;
        let whole_bytes = KEY_BITS.saturating_sub(start) / 8;
        for i in 0..whole_bytes.min(TAIL_LEN) {
            let offset = start + i * 8;
            let index = offset / 8;
            let shift = offset % 8;
            bytes[TAIL_OFFSET + i] = if shift == 0 {
                inverted[index]
            } else {
                (inverted[index] << shift) | (inverted[index + 1] >> (8 - shift))
            };
        }

        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// The eight big-endian 16-bit groups.
    pub fn groups(&self) -> [u16; 8] {
        let mut groups = [0u16; 8];
        for (i, group) in groups.iter_mut().enumerate() {
            *group = u16::from_be_bytes([self.0[2 * i], self.0[2 * i + 1]]);
        }
        groups
    }
}

impl From<&PublicKey> for Address {
    fn from(key: &PublicKey) -> Self {
        Self::for_key(key)
    }
}

/// All eight groups, no `::` compression.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.groups();
        write!(
            f,
            "{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}",
            g[0], g[1], g[2], g[3], g[4], g[5], g[6], g[7]
        )
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}
