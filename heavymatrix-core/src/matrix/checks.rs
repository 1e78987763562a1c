//! Suitability checks for HeavyHash matrices

use super::heavy::{HeavyMatrix, MATRIX_DIM};
use super::rank::{matrix_rank, CheckMatrix};

/// Singular values at or below this are treated as zero by [`svd_rank`]
pub const SVD_EPSILON: f64 = 1e-9;

/// Every entry fits in 4 bits
pub fn is_four_bit_precision(matrix: &HeavyMatrix) -> bool {
    matrix.is_four_bit()
}

/// Rank 64 by Gaussian elimination
pub fn is_full_rank(matrix: &HeavyMatrix) -> bool {
    matrix_rank(matrix.to_check_matrix()) == MATRIX_DIM
}

/// Numerical rank from the singular value decomposition
///
/// Independent of the elimination path; used to cross-check it.
pub fn svd_rank(matrix: &CheckMatrix, eps: f64) -> usize {
    matrix.clone().svd(false, false).rank(eps)
}

/// Both conditions the hash relies on
pub fn is_valid_heavy_matrix(matrix: &HeavyMatrix) -> bool {
    is_four_bit_precision(matrix) && is_full_rank(matrix)
}
