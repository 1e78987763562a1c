//! Seed Loader — 32 seed bytes to xoshiro256++ state
//!
//! The seed is read as four consecutive little-endian 64-bit words:
//! bytes 0..8 → s0, 8..16 → s1, 16..24 → s2, 24..32 → s3.

use crate::error::{HeavyMatrixError, Result};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Seed length in bytes (256 bits)
pub const SEED_LEN: usize = 32;

/// Convert a 32-byte seed into the generator's four-word state
///
/// Any length other than 32 is rejected before a state is built.
pub fn load_state(bytes: &[u8]) -> Result<[u64; 4]> {
    if bytes.len() != SEED_LEN {
        return Err(HeavyMatrixError::InvalidSeedLength {
            expected: SEED_LEN,
            actual: bytes.len(),
        });
    }
    Ok(words_le(bytes))
}

pub(crate) fn words_le(bytes: &[u8]) -> [u64; 4] {
    let mut state = [0u64; 4];
    for (word, chunk) in state.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut le = [0u8; 8];
        le.copy_from_slice(chunk);
        *word = u64::from_le_bytes(le);
    }
    state
}

/// A 256-bit matrix seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatrixSeed([u8; SEED_LEN]);

impl MatrixSeed {
    /// Seed of the process-wide default matrix (first byte 1, the rest zero)
    pub const DEFAULT: MatrixSeed = {
        let mut bytes = [0u8; SEED_LEN];
        bytes[0] = 1;
        MatrixSeed(bytes)
    };

    pub const fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SEED_LEN] = bytes.try_into().map_err(|_| {
            HeavyMatrixError::InvalidSeedLength {
                expected: SEED_LEN,
                actual: bytes.len(),
            }
        })?;
        Ok(Self(array))
    }

    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim().trim_start_matches("0x"))?;
        Self::from_slice(&bytes)
    }

    /// Derive a block's matrix seed from its parent block hash: SHA3-256(parent)
    pub fn from_parent_hash(parent_hash: &[u8; SEED_LEN]) -> Self {
        let digest = Sha3_256::digest(parent_hash);
        let mut bytes = [0u8; SEED_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Generator state for this seed
    pub fn state(&self) -> [u64; 4] {
        words_le(&self.0)
    }
}

impl fmt::Display for MatrixSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for MatrixSeed {
    type Error = HeavyMatrixError;

    fn try_from(text: String) -> Result<Self> {
        Self::from_hex(&text)
    }
}

impl From<MatrixSeed> for String {
    fn from(seed: MatrixSeed) -> Self {
        seed.to_hex()
    }
}

impl From<[u8; SEED_LEN]> for MatrixSeed {
    fn from(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }
}
