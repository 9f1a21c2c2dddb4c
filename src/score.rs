//! Candidate scoring and ranking

use crate::address::Address;
use crate::keys::{KeyPair, PublicKey};

/// Leading zero bits of the key, most significant byte first.
#[inline(always)]
pub fn key_score(key: &PublicKey) -> u32 {
    let mut count = 0;
    for byte in key.as_bytes() {
        let bits = byte.leading_zeros();
        count += bits;
        if bits != 8 {
            break;
        }
    }
    count
}

/// Longest run of all-zero 16-bit groups, ignoring group 0 (prefix and ones count).
pub fn address_score(address: &Address) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for group in &address.groups()[1..] {
        if *group == 0 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Which metric decides whether one candidate beats another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
    /// More leading zero bits in the public key.
    #[default]
    KeyBits,
    /// Longer zero-group run in the address, key bits as tie-break.
    AddressBlocks,
}

impl Ranking {
    pub fn from_address_quality(enabled: bool) -> Self {
        if enabled {
            Ranking::AddressBlocks
        } else {
            Ranking::KeyBits
        }
    }
}

/// A keypair with its derived address and both scores. Immutable once built.
#[derive(Clone, Debug)]
pub struct Candidate {
    keys: KeyPair,
    address: Address,
    key_score: u32,
    address_score: u32,
}

impl Candidate {
    pub fn new(keys: KeyPair) -> Self {
        let address = Address::for_key(&keys.public);
        Self {
            key_score: key_score(&keys.public),
            address_score: address_score(&address),
            address,
            keys,
        }
    }

    /// Candidate with scores fixed by the caller, for ranking tests.
    #[cfg(test)]
    pub(crate) fn with_scores(keys: KeyPair, key_score: u32, address_score: u32) -> Self {
        Self {
            address: Address::for_key(&keys.public),
            keys,
            key_score,
            address_score,
        }
    }

    pub fn keys(&self) -> &KeyPair {
        &self.keys
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn key_score(&self) -> u32 {
        self.key_score
    }

    pub fn address_score(&self) -> u32 {
        self.address_score
    }

    /// Strictly better under `ranking`. Ties are never better.
    #[inline(always)]
    pub fn is_better(&self, other: &Candidate, ranking: Ranking) -> bool {
        match ranking {
            Ranking::KeyBits => self.key_score > other.key_score,
            Ranking::AddressBlocks => {
                self.address_score > other.address_score
                    || (self.address_score == other.address_score
                        && self.key_score > other.key_score)
            }
        }
    }

    /// `is_better` against an optional incumbent; anything beats nothing.
    pub fn improves_on(&self, incumbent: Option<&Candidate>, ranking: Ranking) -> bool {
        incumbent.map_or(true, |best| self.is_better(best, ranking))
    }
}
