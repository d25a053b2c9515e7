//! Row-at-a-time construction of invertible matrices.
//!
//! [`IncrementalMatrix`] accepts candidate rows one by one and keeps only
//! those that are linearly independent of the rows already accepted. Next to
//! the accepted rows it maintains a reduced echelon basis of their span, so a
//! candidate is tested with one pass over the basis, and a coefficient row
//! for every basis vector, so the inverse is available as soon as the basis is
//! complete without a separate elimination.
//!
//! For basis row `i` the builder keeps
//!
//! ```text
//! simplest[i] = XOR of raw[j] over every j with inverse[i] bit j set
//! ```
//!
//! and `simplest[i]` has bit `pivots[i]` set while every other basis row has
//! it clear. Once the rank reaches the dimension, `simplest` is a row
//! permutation of the identity, so placing `inverse[i]` at row `pivots[i]`
//! yields the inverse of the raw matrix.

use rand::{CryptoRng, RngCore};
use tracing::trace;

use crate::error::{check_aligned, MatrixError, Result};
use crate::matrix::Matrix;
use crate::row::Row;

/// Builder for an `n×n` invertible matrix fed one independent row at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncrementalMatrix {
    dimension: usize,
    raw: Vec<Row>,
    simplest: Vec<Row>,
    inverse: Vec<Row>,
    pivots: Vec<usize>,
}

impl IncrementalMatrix {
    /// Creates an empty builder for `dimension`-bit rows.
    pub fn new(dimension: usize) -> Result<Self> {
        check_aligned(dimension)?;
        Ok(Self {
            dimension,
            raw: Vec::with_capacity(dimension),
            simplest: Vec::with_capacity(dimension),
            inverse: Vec::with_capacity(dimension),
            pivots: Vec::with_capacity(dimension),
        })
    }

    /// Target dimension `n`.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Current rank.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true before any row has been accepted.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns true once the accepted rows form a basis.
    pub fn fully_defined(&self) -> bool {
        self.raw.len() == self.dimension
    }

    /// Tries to extend the basis with `row`.
    ///
    /// Returns `Ok(false)` and leaves the builder untouched when `row` lies in
    /// the span of the rows accepted so far.
    pub fn add(&mut self, row: &Row) -> Result<bool> {
        self.check_width(row)?;
        if self.fully_defined() {
            trace!(dimension = self.dimension, "row rejected: basis complete");
            return Ok(false);
        }

        let position = self.raw.len();
        let mut reduced = row.clone();
        let mut coefficients = Row::unit(self.dimension, position)?;
        self.reduce(&mut reduced, Some(&mut coefficients));

        let Some(pivot) = reduced.first_set_bit() else {
            trace!(rank = position, "row rejected: linearly dependent");
            return Ok(false);
        };

        for (simple, inverse) in self.simplest.iter_mut().zip(self.inverse.iter_mut()) {
            if simple.bit(pivot) {
                simple.xor_assign(&reduced);
                inverse.xor_assign(&coefficients);
            }
        }

        self.raw.push(row.clone());
        self.simplest.push(reduced);
        self.inverse.push(coefficients);
        self.pivots.push(pivot);
        trace!(rank = self.raw.len(), pivot, "row accepted");
        Ok(true)
    }

    /// Returns true if `row` is a combination of the accepted rows.
    pub fn is_in_span(&self, row: &Row) -> Result<bool> {
        self.check_width(row)?;
        Ok(self.spans(row))
    }

    /// Draws a random row guaranteed to be outside the current span.
    ///
    /// With rank `r` a uniform draw falls inside the span with probability
    /// `2^(r-n)`, so only single rows are ever discarded.
    pub fn novel<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Row> {
        if self.fully_defined() {
            return Err(MatrixError::AlreadyComplete {
                dimension: self.dimension,
            });
        }
        loop {
            let candidate = Row::random(rng, self.dimension)?;
            if !self.spans(&candidate) {
                return Ok(candidate);
            }
            trace!(rank = self.raw.len(), "novel candidate fell in span");
        }
    }

    /// The accepted rows in insertion order.
    ///
    /// Square and invertible only once [`fully_defined`](Self::fully_defined).
    pub fn matrix(&self) -> Matrix {
        Matrix::from_rows_unchecked(self.raw.clone(), self.dimension)
    }

    /// The inverse of [`matrix`](Self::matrix).
    pub fn inverse(&self) -> Result<Matrix> {
        if !self.fully_defined() {
            return Err(MatrixError::Incomplete {
                rank: self.raw.len(),
                dimension: self.dimension,
            });
        }
        let mut placed: Vec<(usize, &Row)> =
            self.pivots.iter().copied().zip(self.inverse.iter()).collect();
        placed.sort_unstable_by_key(|(pivot, _)| *pivot);
        let rows = placed.into_iter().map(|(_, row)| row.clone()).collect();
        Ok(Matrix::from_rows_unchecked(rows, self.dimension))
    }

    fn spans(&self, row: &Row) -> bool {
        let mut reduced = row.clone();
        self.reduce(&mut reduced, None);
        reduced.is_zero()
    }

    /// Clears every pivot column of `row`, mirroring the combination onto
    /// `coefficients` when given.
    fn reduce(&self, row: &mut Row, mut coefficients: Option<&mut Row>) {
        let basis = self
            .pivots
            .iter()
            .zip(self.simplest.iter())
            .zip(self.inverse.iter());
        for ((&pivot, simple), inverse) in basis {
            if row.bit(pivot) {
                row.xor_assign(simple);
                if let Some(coefficients) = coefficients.as_deref_mut() {
                    coefficients.xor_assign(inverse);
                }
            }
        }
    }

    fn check_width(&self, row: &Row) -> Result<()> {
        if row.len() != self.dimension {
            return Err(MatrixError::LengthMismatch {
                left: self.dimension,
                right: row.len(),
            });
        }
        Ok(())
    }
}
