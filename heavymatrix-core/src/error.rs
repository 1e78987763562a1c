//! Error types for matrix generation, validation and persistence

/// Errors surfaced by the HeavyMatrix core
///
/// Rank deficiency is not represented here: a deficient candidate is
/// silently discarded and regenerated.
#[derive(Debug, thiserror::Error)]
pub enum HeavyMatrixError {
    #[error("invalid seed length: expected {expected} bytes, got {actual}")]
    InvalidSeedLength { expected: usize, actual: usize },

    #[error("invalid seed hex: {0}")]
    InvalidSeedHex(#[from] hex::FromHexError),

    #[error("degenerate seed: generator state is all zero and cannot produce a full-rank matrix")]
    DegenerateSeed,

    #[error("no full-rank matrix after {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid matrix shape: {rows} rows, {cols} columns in row (expected 64x64)")]
    InvalidShape { rows: usize, cols: usize },

    #[error("invalid matrix size: expected {expected} entries, got {actual}")]
    InvalidCellCount { expected: usize, actual: usize },

    #[error("entry ({row}, {col}) = {value} exceeds 4-bit precision")]
    NibbleOutOfRange { row: usize, col: usize, value: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HeavyMatrixError>;
