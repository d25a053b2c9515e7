//! Random invertible matrix generation for masking layers.

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::error::Result;
use crate::matrix::{Matrix, DEFAULT_MAX_ATTEMPTS};
use crate::row::Row;

/// How invertible matrices are sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Grow the matrix one independent row at a time.
    #[default]
    Incremental,
    /// Draw whole matrices until one is invertible.
    Rejection,
}

/// Configuration for the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Sampling strategy.
    pub strategy: GenerationStrategy,
    /// Whole-matrix draws allowed per request under [`GenerationStrategy::Rejection`].
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: GenerationStrategy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Matrix generator parametrized by an RNG.
///
/// Given a deterministic RNG the output sequence is deterministic.
pub struct Generator<R: RngCore + CryptoRng> {
    rng: R,
    config: GeneratorConfig,
}

impl<R: RngCore + CryptoRng> Generator<R> {
    /// Creates a new generator with default configuration.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: GeneratorConfig::default(),
        }
    }

    /// Creates a generator with explicit configuration.
    pub fn with_config(rng: R, config: GeneratorConfig) -> Self {
        Self { rng, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        &mut self.config
    }

    /// Returns the underlying RNG.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draws a uniformly random `bits`-bit row.
    pub fn random_row(&mut self, bits: usize) -> Result<Row> {
        Row::random(&mut self.rng, bits)
    }

    /// Draws a random invertible `n×n` matrix.
    pub fn random_matrix(&mut self, n: usize) -> Result<Matrix> {
        Ok(self.random_invertible(n)?.0)
    }

    /// Draws a random invertible `n×n` matrix together with its inverse.
    pub fn random_invertible(&mut self, n: usize) -> Result<(Matrix, Matrix)> {
        debug!(dimension = n, strategy = ?self.config.strategy, "generating invertible matrix");
        match self.config.strategy {
            GenerationStrategy::Incremental => Matrix::random_invertible(&mut self.rng, n),
            GenerationStrategy::Rejection => {
                Matrix::rejection_sample(&mut self.rng, n, self.config.max_attempts)
            }
        }
    }

    /// Draws a masking pair `(mask, unmask)` and the composition of `inner`
    /// between them: `mask × inner`.
    pub fn mask(&mut self, inner: &Matrix) -> Result<(Matrix, Matrix, Matrix)> {
        let (rows, _) = inner.size();
        let (mask, unmask) = self.random_invertible(rows)?;
        let masked = mask.compose(inner)?;
        Ok((mask, unmask, masked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn both_strategies_yield_inverse_pairs() {
        for strategy in [GenerationStrategy::Incremental, GenerationStrategy::Rejection] {
            let mut gen = Generator::with_config(
                ChaCha20Rng::from_seed([50u8; 32]),
                GeneratorConfig {
                    strategy,
                    ..GeneratorConfig::default()
                },
            );
            let (m, inv) = gen.random_invertible(32).unwrap();
            assert_eq!(m.compose(&inv).unwrap(), Matrix::identity(32).unwrap());
            assert_eq!(inv.compose(&m).unwrap(), Matrix::identity(32).unwrap());
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let mut a = Generator::new(ChaCha20Rng::from_seed([51u8; 32]));
        let mut b = Generator::new(ChaCha20Rng::from_seed([51u8; 32]));
        assert_eq!(a.random_matrix(64).unwrap(), b.random_matrix(64).unwrap());
        assert_eq!(a.random_row(16).unwrap(), b.random_row(16).unwrap());
    }

    #[test]
    fn unmask_undoes_mask() {
        let mut gen = Generator::new(ChaCha20Rng::from_seed([52u8; 32]));
        let inner = gen.random_matrix(16).unwrap();
        let (mask, unmask, masked) = gen.mask(&inner).unwrap();
        assert_eq!(unmask.compose(&masked).unwrap(), inner);
        assert_eq!(mask.compose(&unmask).unwrap(), Matrix::identity(16).unwrap());
    }

    #[test]
    fn config_is_mutable() {
        let mut gen = Generator::new(ChaCha20Rng::from_seed([53u8; 32]));
        gen.config_mut().strategy = GenerationStrategy::Rejection;
        gen.config_mut().max_attempts = 0;
        assert!(gen.random_matrix(8).is_err());
    }
}
