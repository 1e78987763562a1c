//! Matrix Generator — fills 64×64 nibble matrices from the xoshiro256++
//! stream and keeps going until one is full rank
//!
//! Each 64-bit draw supplies 16 consecutive entries of a row, most
//! significant nibble first, so one candidate costs 256 draws. A rejected
//! candidate is followed by a fresh one from the same, already advanced
//! stream; the generator is never re-seeded between attempts.

use super::heavy::{HeavyMatrix, MATRIX_DIM};
use super::rank::matrix_rank;
use crate::config::GeneratorConfig;
use crate::error::{HeavyMatrixError, Result};
use crate::prng::{MatrixSeed, Xoshiro256PlusPlus};
use log::{debug, warn};
use std::sync::OnceLock;

/// Entries taken from one 64-bit draw
const NIBBLES_PER_DRAW: usize = 16;

/// Draws consumed by one candidate
pub const DRAWS_PER_MATRIX: usize = MATRIX_DIM * MATRIX_DIM / NIBBLES_PER_DRAW;

static DEFAULT_MATRIX: OnceLock<HeavyMatrix> = OnceLock::new();

/// Owns a generator stream and produces full-rank matrices from it
#[derive(Debug, Clone)]
pub struct MatrixGenerator {
    rng: Xoshiro256PlusPlus,
    config: GeneratorConfig,
    attempts: u64,
}

impl MatrixGenerator {
    pub fn new(seed: &[u8]) -> Result<Self> {
        Self::with_config(seed, GeneratorConfig::default())
    }

    pub fn with_config(seed: &[u8], config: GeneratorConfig) -> Result<Self> {
        let rng = Xoshiro256PlusPlus::from_seed_bytes(seed)?;
        Ok(Self::from_rng(rng, config))
    }

    /// Continue from an existing stream position
    pub fn from_rng(rng: Xoshiro256PlusPlus, config: GeneratorConfig) -> Self {
        Self {
            rng,
            config,
            attempts: 0,
        }
    }

    /// Candidates built so far, accepted or not
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn rng(&self) -> &Xoshiro256PlusPlus {
        &self.rng
    }

    /// Fill one candidate from the next 256 draws, without validating it
    pub fn next_candidate(&mut self) -> HeavyMatrix {
        let mut matrix = HeavyMatrix::zeroed();
        for row in 0..MATRIX_DIM {
            for block in (0..MATRIX_DIM).step_by(NIBBLES_PER_DRAW) {
                let value = self.rng.next_u64();
                for shift in 0..NIBBLES_PER_DRAW {
                    let nibble = (value >> (60 - 4 * shift)) & 0xF;
                    matrix.set(row, block + shift, nibble as u8);
                }
            }
        }
        self.attempts += 1;
        matrix
    }

    /// Produce the next full-rank matrix in the stream
    pub fn generate(&mut self) -> Result<HeavyMatrix> {
        self.generate_with(|candidate| matrix_rank(candidate.to_check_matrix()))
    }

    /// Generation loop with the rank measurement supplied by the caller;
    /// a candidate is accepted once `rank_of` reports [`MATRIX_DIM`]
    pub(crate) fn generate_with<F>(&mut self, mut rank_of: F) -> Result<HeavyMatrix>
    where
        F: FnMut(&HeavyMatrix) -> usize,
    {
        self.config.validate()?;
        let mut tries = 0u64;
        loop {
            let candidate = self.next_candidate();
            tries += 1;

            let rank = rank_of(&candidate);
            if rank == MATRIX_DIM {
                debug!(
                    "Accepted matrix {} after {} attempt(s)",
                    &candidate.fingerprint()[..16],
                    tries
                );
                return Ok(candidate);
            }

            warn!("Candidate matrix has rank {}, regenerating from advanced state", rank);

            if let Some(max) = self.config.max_attempts {
                if tries >= max {
                    return Err(HeavyMatrixError::AttemptsExhausted { attempts: tries });
                }
            }
            if self.rng.is_degenerate() {
                return Err(HeavyMatrixError::DegenerateSeed);
            }
        }
    }
}

/// Generate the full-rank HeavyHash matrix for a 32-byte seed
pub fn generate_matrix(seed: &[u8]) -> Result<HeavyMatrix> {
    MatrixGenerator::new(seed)?.generate()
}

/// Generate with explicit limits
pub fn generate_matrix_with(seed: &MatrixSeed, config: &GeneratorConfig) -> Result<HeavyMatrix> {
    MatrixGenerator::with_config(seed.as_bytes(), config.clone())?.generate()
}

/// The process-wide matrix for [`MatrixSeed::DEFAULT`], built on first use
pub fn default_matrix() -> &'static HeavyMatrix {
    DEFAULT_MATRIX.get_or_init(|| {
        generate_matrix(MatrixSeed::DEFAULT.as_bytes())
            .expect("default seed must produce a full-rank matrix")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const DEFAULT_FINGERPRINT: &str =
        "1752207b4a75899381dbea9c617e59de786646eb1ad771f259c3709dd5eb2f6d";

    /// State of the default-seed stream after one candidate
    const DEFAULT_STATE_AFTER_ONE: [u64; 4] = [
        9_465_205_232_320_175_253,
        11_709_038_363_580_227_569,
        709_159_522_411_537_372,
        12_576_959_960_781_965_860,
    ];

    fn default_rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::from_seed_bytes(MatrixSeed::DEFAULT.as_bytes()).unwrap()
    }

    #[test]
    fn test_default_seed_matrix() {
        let m = generate_matrix(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        assert_eq!(&m.row(0)[..16], &[0u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 0, 1]);
        assert_eq!(
            &m.row(63)[48..],
            &[1u8, 15, 10, 14, 13, 3, 3, 9, 8, 3, 1, 11, 13, 0, 11, 14]
        );
        assert_eq!(m.fingerprint(), DEFAULT_FINGERPRINT);
    }

    #[test]
    fn test_parent_hash_seed_matrix() {
        let seed = MatrixSeed::from_parent_hash(&[0u8; 32]);
        let m = generate_matrix(seed.as_bytes()).unwrap();
        assert_eq!(&m.row(0)[..8], &[13u8, 6, 6, 6, 3, 5, 10, 11]);
        assert_eq!(
            m.fingerprint(),
            "80b4d1475dd7a1c5076f42284a49a0516f413a43980fc55f16c371816838cd03"
        );
    }

    #[test]
    fn test_first_nibble_is_most_significant() {
        let mut rng = default_rng();
        let first = rng.next_u64();
        let mut generator = MatrixGenerator::new(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        let m = generator.next_candidate();
        for shift in 0..16 {
            assert_eq!(u64::from(m.get(0, shift)), (first >> (60 - 4 * shift)) & 0xF);
        }
    }

    #[test]
    fn test_candidate_consumes_256_draws() {
        let mut expected = default_rng();
        for _ in 0..DRAWS_PER_MATRIX {
            expected.next_u64();
        }
        let mut generator = MatrixGenerator::new(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        generator.generate().unwrap();
        assert_eq!(generator.rng(), &expected);
        assert_eq!(generator.rng().state(), DEFAULT_STATE_AFTER_ONE);
        assert_eq!(generator.attempts(), 1);
    }

    #[test]
    fn test_stream_continues_across_calls() {
        let mut generator = MatrixGenerator::new(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);

        let advanced = Xoshiro256PlusPlus::from_state(DEFAULT_STATE_AFTER_ONE);
        let resumed = MatrixGenerator::from_rng(advanced, GeneratorConfig::default())
            .generate()
            .unwrap();
        assert_eq!(resumed, second);
    }

    #[test]
    fn test_deterministic_random_seeds() {
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            let seed: [u8; 32] = rng.gen();
            let a = generate_matrix(&seed).unwrap();
            let b = generate_matrix(&seed).unwrap();
            assert_eq!(a, b);
            assert!(a.is_four_bit());
            assert_eq!(matrix_rank(a.to_check_matrix()), MATRIX_DIM);
        }
    }

    #[test]
    fn test_invalid_seed_length() {
        for len in [0usize, 16, 31, 33] {
            match generate_matrix(&vec![1u8; len]) {
                Err(HeavyMatrixError::InvalidSeedLength { expected: 32, actual }) => {
                    assert_eq!(actual, len)
                }
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_seed_is_degenerate() {
        let mut generator = MatrixGenerator::new(&[0u8; 32]).unwrap();
        assert!(matches!(generator.generate(), Err(HeavyMatrixError::DegenerateSeed)));
        assert_eq!(generator.attempts(), 1);
    }

    #[test]
    fn test_attempt_cap() {
        let config = GeneratorConfig { max_attempts: Some(1) };
        let seed = MatrixSeed::new([0u8; 32]);
        match generate_matrix_with(&seed, &config) {
            Err(HeavyMatrixError::AttemptsExhausted { attempts }) => assert_eq!(attempts, 1),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(generate_matrix_with(&MatrixSeed::DEFAULT, &config).is_ok());
    }

    #[test]
    fn test_rejected_candidate_retries_from_advanced_state() {
        let mut calls = 0;
        let mut generator = MatrixGenerator::new(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        let accepted = generator
            .generate_with(|candidate| {
                calls += 1;
                if calls == 1 {
                    MATRIX_DIM - 1
                } else {
                    matrix_rank(candidate.to_check_matrix())
                }
            })
            .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(generator.attempts(), 2);

        let mut fresh = MatrixGenerator::new(MatrixSeed::DEFAULT.as_bytes()).unwrap();
        let first = fresh.next_candidate();
        let second = fresh.next_candidate();
        assert_ne!(accepted, first);
        assert_eq!(accepted, second);
        assert_eq!(generator.rng(), fresh.rng());

        let resumed = MatrixGenerator::from_rng(
            Xoshiro256PlusPlus::from_state(DEFAULT_STATE_AFTER_ONE),
            GeneratorConfig::default(),
        )
        .generate()
        .unwrap();
        assert_eq!(accepted, resumed);
    }

    #[test]
    fn test_cap_honoured_on_rejection() {
        let config = GeneratorConfig { max_attempts: Some(3) };
        let mut generator =
            MatrixGenerator::with_config(MatrixSeed::DEFAULT.as_bytes(), config).unwrap();
        match generator.generate_with(|_| 0) {
            Err(HeavyMatrixError::AttemptsExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(generator.attempts(), 3);
    }

    #[test]
    fn test_zero_attempt_cap_draws_nothing() {
        let config = GeneratorConfig { max_attempts: Some(0) };
        let mut generator =
            MatrixGenerator::with_config(MatrixSeed::DEFAULT.as_bytes(), config.clone()).unwrap();
        assert!(matches!(generator.generate(), Err(HeavyMatrixError::InvalidConfig(_))));
        assert_eq!(generator.attempts(), 0);
        assert_eq!(generator.rng(), &default_rng());
        assert!(matches!(
            generate_matrix_with(&MatrixSeed::DEFAULT, &config),
            Err(HeavyMatrixError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_matrix_is_shared() {
        let a = default_matrix();
        let b = default_matrix();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.fingerprint(), DEFAULT_FINGERPRINT);
    }
}
