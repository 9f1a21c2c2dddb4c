//! Ed25519 keypairs derived from a seed
//!
//! The secret key uses the 64-byte `seed || public` layout so it can be
//! pasted straight into a node configuration.

use crate::error::KeyError;
use crate::seed::Seed;
use ed25519_dalek::SigningKey;
use std::fmt;
use zeroize::Zeroize;

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 64;

/// Decode lowercase or uppercase hex into a fixed-size array.
pub(crate) fn decode_hex_array<const N: usize>(hex: &str) -> Result<[u8; N], KeyError> {
    let bytes = hex::decode(hex)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| KeyError::Length { expected: N, actual })
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        decode_hex_array(hex).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Public key, secret key and the seed they were derived from.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
    pub seed: Seed,
}

impl KeyPair {
    /// Deterministic RFC 8032 derivation. Identical seeds give identical keys.
    pub fn from_seed(seed: &Seed) -> Self {
        let signing = SigningKey::from_bytes(seed.as_bytes());
        Self {
            public: PublicKey(signing.verifying_key().to_bytes()),
            secret: SecretKey(signing.to_keypair_bytes()),
            seed: seed.clone(),
        }
    }
}
