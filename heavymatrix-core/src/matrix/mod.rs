//! HeavyHash matrix — generation, rank checking and validation
//!
//! - `HeavyMatrix`: the 64×64 nibble matrix
//! - generator: xoshiro256++ stream → full-rank matrix, retrying on deficiency
//! - rank: Gaussian elimination on an owned f64 copy
//! - checks: 4-bit precision and full-rank predicates

mod checks;
mod generator;
mod heavy;
mod rank;

pub use checks::{is_four_bit_precision, is_full_rank, is_valid_heavy_matrix, svd_rank, SVD_EPSILON};
pub use generator::{
    default_matrix, generate_matrix, generate_matrix_with, MatrixGenerator, DRAWS_PER_MATRIX,
};
pub use heavy::{HeavyMatrix, MATRIX_CELLS, MATRIX_DIM, NIBBLE_MAX};
pub use rank::{matrix_rank, CheckMatrix};
