//! HeavyMatrix — deterministic full-rank matrices for HeavyHash
//!
//! A 256-bit seed drives an xoshiro256++ stream that fills a 64×64 matrix of
//! 4-bit entries. Candidates are checked by Gaussian elimination and
//! regenerated from the advancing stream until one has rank 64.

pub mod config;
pub mod error;
pub mod matrix;
pub mod prng;
pub mod storage;

pub use config::{CacheConfig, GeneratorConfig, HeavyMatrixConfig};
pub use error::{HeavyMatrixError, Result};
pub use matrix::{
    default_matrix, generate_matrix, matrix_rank, CheckMatrix, HeavyMatrix, MatrixGenerator,
};
pub use prng::{MatrixSeed, Xoshiro256PlusPlus};
pub use storage::MatrixCache;
