//! PRNG — xoshiro256++ engine and seed loading
//!
//! Matrix generation pulls every entry from this stream, so the engine must
//! match 64-bit wraparound semantics bit for bit.

mod seed;
mod xoshiro;

pub use seed::{load_state, MatrixSeed, SEED_LEN};
pub use xoshiro::{rotl64, xoshiro256pp, Xoshiro256PlusPlus};
