//! xoshiro256++ — the pseudo-random engine behind matrix generation
//!
//! 256 bits of state, one 64-bit output per step. All arithmetic wraps
//! modulo 2^64.

use super::seed::{load_state, words_le, SEED_LEN};
use crate::error::Result;
use rand::{RngCore, SeedableRng};

/// 64-bit left rotation
#[inline]
pub fn rotl64(x: u64, k: u32) -> u64 {
    x.rotate_left(k)
}

/// One xoshiro256++ step: returns the output and the next state
#[inline]
pub fn xoshiro256pp(state: [u64; 4]) -> (u64, [u64; 4]) {
    let [mut s0, mut s1, mut s2, mut s3] = state;
    let result = rotl64(s0.wrapping_add(s3), 23).wrapping_add(s0);

    let t = s1 << 17;

    s2 ^= s0;
    s3 ^= s1;
    s1 ^= s2;
    s0 ^= s3;

    s2 ^= t;

    s3 = rotl64(s3, 45);

    (result, [s0, s1, s2, s3])
}

/// The xoshiro256++ generator
///
/// Not `Copy`: a silently duplicated generator would replay the same stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoshiro256PlusPlus {
    s: [u64; 4],
}

impl Xoshiro256PlusPlus {
    /// Seed from exactly 32 bytes
    pub fn from_seed_bytes(seed: &[u8]) -> Result<Self> {
        Ok(Self { s: load_state(seed)? })
    }

    pub fn from_state(state: [u64; 4]) -> Self {
        Self { s: state }
    }

    /// Replace the state with a fresh seed
    pub fn reseed(&mut self, seed: &[u8]) -> Result<()> {
        self.s = load_state(seed)?;
        Ok(())
    }

    pub fn state(&self) -> [u64; 4] {
        self.s
    }

    /// The all-zero state maps to itself and only ever yields zero
    pub fn is_degenerate(&self) -> bool {
        self.s == [0; 4]
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let (result, next) = xoshiro256pp(self.s);
        self.s = next;
        result
    }
}

impl RngCore for Xoshiro256PlusPlus {
    fn next_u32(&mut self) -> u32 {
        (Xoshiro256PlusPlus::next_u64(self) >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        Xoshiro256PlusPlus::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = Xoshiro256PlusPlus::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xoshiro256PlusPlus {
    type Seed = [u8; SEED_LEN];

    fn from_seed(seed: Self::Seed) -> Self {
        Self { s: words_le(&seed) }
    }
}
