//! Rank Checker — Gaussian elimination with row swapping
//!
//! Works on an owned f64 copy of the matrix: elimination is destructive, so
//! the caller hands over a disposable `CheckMatrix` and keeps its own data.
//! Zero tests are exact; 4-bit integer entries keep 64×64 elimination well
//! inside f64 precision.

use nalgebra::DMatrix;

/// Flat f64 buffer used for rank checks, indexed `(row, col)`
pub type CheckMatrix = DMatrix<f64>;

/// Rank of a square matrix
///
/// The active width starts at the full dimension. A zero pivot is fixed by
/// swapping in a lower row with a non-zero entry in that column; when no such
/// row exists the column is dependent, the active width shrinks by one and the
/// last active column is moved into its slot. Either way the same row is
/// examined again.
pub fn matrix_rank(mut matrix: CheckMatrix) -> usize {
    assert!(matrix.is_square(), "rank check requires a square matrix");
    let rows = matrix.nrows();
    let mut rank = matrix.ncols();
    let mut row = 0;

    while row < rank {
        let pivot = matrix[(row, row)];
        if pivot != 0.0 {
            for other in (0..rows).filter(|&r| r != row) {
                let multiplier = matrix[(other, row)] / pivot;
                for i in 0..rank {
                    let delta = multiplier * matrix[(row, i)];
                    matrix[(other, i)] -= delta;
                }
            }
            row += 1;
            continue;
        }

        match (row + 1..rows).find(|&i| matrix[(i, row)] != 0.0) {
            Some(swap_with) => swap_row_prefix(&mut matrix, row, swap_with, rank),
            None => {
                rank -= 1;
                for i in 0..rows {
                    matrix[(i, row)] = matrix[(i, rank)];
                }
            }
        }
    }

    rank
}

/// Swap the first `width` entries of rows `a` and `b`
fn swap_row_prefix(matrix: &mut CheckMatrix, a: usize, b: usize, width: usize) {
    for col in 0..width {
        matrix.swap((a, col), (b, col));
    }
}
