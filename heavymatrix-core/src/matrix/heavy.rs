//! HeavyMatrix — the 64×64 nibble matrix consumed by HeavyHash
//!
//! Entries are stored row-major in a flat 4096-byte buffer. Every entry is in
//! [0, 15]; the outer hash treats them as multiplication coefficients.

use super::rank::CheckMatrix;
use crate::error::{HeavyMatrixError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Rows and columns of a HeavyHash matrix
pub const MATRIX_DIM: usize = 64;

/// Total entries
pub const MATRIX_CELLS: usize = MATRIX_DIM * MATRIX_DIM;

/// Largest value an entry may hold
pub const NIBBLE_MAX: u8 = 0xF;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct HeavyMatrix {
    cells: Box<[u8; MATRIX_CELLS]>,
}

impl HeavyMatrix {
    pub(crate) fn zeroed() -> Self {
        Self {
            cells: Box::new([0u8; MATRIX_CELLS]),
        }
    }

    /// Build from row-major entries, rejecting anything outside 4-bit range
    pub fn from_cells(cells: &[u8]) -> Result<Self> {
        if cells.len() != MATRIX_CELLS {
            return Err(HeavyMatrixError::InvalidCellCount {
                expected: MATRIX_CELLS,
                actual: cells.len(),
            });
        }
        let mut matrix = Self::zeroed();
        for (idx, &value) in cells.iter().enumerate() {
            if value > NIBBLE_MAX {
                return Err(HeavyMatrixError::NibbleOutOfRange {
                    row: idx / MATRIX_DIM,
                    col: idx % MATRIX_DIM,
                    value,
                });
            }
            matrix.cells[idx] = value;
        }
        Ok(matrix)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * MATRIX_DIM + col]
    }

    /// Write one entry; callers mask to 4 bits
    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(value <= NIBBLE_MAX);
        self.cells[row * MATRIX_DIM + col] = value;
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * MATRIX_DIM;
        &self.cells[start..start + MATRIX_DIM]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(MATRIX_DIM)
    }

    /// Row-major entries
    pub fn as_slice(&self) -> &[u8] {
        &self.cells[..]
    }

    /// Independent f64 copy for destructive rank checking
    pub fn to_check_matrix(&self) -> CheckMatrix {
        CheckMatrix::from_fn(MATRIX_DIM, MATRIX_DIM, |r, c| f64::from(self.get(r, c)))
    }

    pub fn is_four_bit(&self) -> bool {
        self.cells.iter().all(|&v| v <= NIBBLE_MAX)
    }

    /// Fingerprint: SHA256 over the row-major entries
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.cells[..]);
        hex::encode(hasher.finalize())
    }

    /// One string of 64 hex nibbles per row
    pub fn to_hex_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|&v| char::from_digit(u32::from(v), 16).unwrap_or('?'))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Debug for HeavyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeavyMatrix")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl fmt::Display for HeavyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_hex_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u8>>> for HeavyMatrix {
    type Error = HeavyMatrixError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        if rows.len() != MATRIX_DIM {
            return Err(HeavyMatrixError::InvalidShape {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != MATRIX_DIM) {
            return Err(HeavyMatrixError::InvalidShape {
                rows: rows.len(),
                cols: bad.len(),
            });
        }
        let flat: Vec<u8> = rows.into_iter().flatten().collect();
        Self::from_cells(&flat)
    }
}

impl From<HeavyMatrix> for Vec<Vec<u8>> {
    fn from(matrix: HeavyMatrix) -> Self {
        matrix.rows().map(<[u8]>::to_vec).collect()
    }
}
