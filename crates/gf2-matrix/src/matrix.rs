//! GF(2) matrices of arbitrary byte-aligned dimension.

use core::fmt;

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::error::{check_aligned, MatrixError, Result};
use crate::incremental::IncrementalMatrix;
use crate::row::Row;

/// Number of whole-matrix draws [`Matrix::random`] makes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Binary matrix over GF(2), stored row-major as a sequence of [`Row`]s.
///
/// Row `i` bit `j` is the coefficient of input bit `j` in output bit `i`.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Row>,
    cols: usize,
}

impl Matrix {
    /// Returns the `n×n` zero matrix.
    pub fn zero(n: usize) -> Result<Self> {
        let row = Row::zero(n)?;
        Ok(Self {
            rows: vec![row; n],
            cols: n,
        })
    }

    /// Returns the `n×n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut out = Self::zero(n)?;
        for (i, row) in out.rows.iter_mut().enumerate() {
            row.set_bit(i, true);
        }
        Ok(out)
    }

    /// Returns the `n×n` matrix with every entry set.
    pub fn full(n: usize) -> Result<Self> {
        check_aligned(n)?;
        Ok(Self {
            rows: vec![Row::from_bytes(vec![0xffu8; n / 8]); n],
            cols: n,
        })
    }

    /// Builds a matrix from rows of equal width.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self> {
        let cols = rows.first().map_or(0, Row::len);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: idx,
                    expected: cols,
                    actual: row.len(),
                });
            }
        }
        Ok(Self { rows, cols })
    }

    pub(crate) fn from_rows_unchecked(rows: Vec<Row>, cols: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == cols));
        Self { rows, cols }
    }

    /// Parses one hex-encoded row per non-empty line.
    pub fn from_hex_lines(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Row::from_hex)
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// Returns the matrix of a linear map on `bits`-bit byte buffers.
    ///
    /// The map is evaluated once per unit vector; the image of input bit `j`
    /// becomes column `j`.
    pub fn from_linear_map<F>(bits: usize, mut map: F) -> Result<Self>
    where
        F: FnMut(&mut [u8]),
    {
        let mut out = Self::zero(bits)?;
        for col in 0..bits {
            let mut image = Row::unit(bits, col)?.as_bytes().to_vec();
            map(&mut image);
            if image.len() != bits / 8 {
                return Err(MatrixError::LengthMismatch {
                    left: bits,
                    right: 8 * image.len(),
                });
            }
            let image = Row::from_bytes(image);
            for (row_idx, row) in out.rows.iter_mut().enumerate() {
                if image.bit(row_idx) {
                    row.set_bit(col, true);
                }
            }
        }
        Ok(out)
    }

    /// Draws a uniformly random invertible `n×n` matrix by whole-matrix
    /// rejection, giving up after [`DEFAULT_MAX_ATTEMPTS`] draws.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Result<Self> {
        Self::random_with_limit(rng, n, DEFAULT_MAX_ATTEMPTS)
    }

    /// Whole-matrix rejection sampling bounded by `max_attempts` draws.
    ///
    /// Every singular draw is discarded entirely and a fresh `n×n` matrix is
    /// sampled.
    pub fn random_with_limit<R: RngCore + CryptoRng>(
        rng: &mut R,
        n: usize,
        max_attempts: usize,
    ) -> Result<Self> {
        Ok(Self::rejection_sample(rng, n, max_attempts)?.0)
    }

    pub(crate) fn rejection_sample<R: RngCore + CryptoRng>(
        rng: &mut R,
        n: usize,
        max_attempts: usize,
    ) -> Result<(Self, Self)> {
        for attempt in 1..=max_attempts {
            let candidate = Self::uniform(rng, n)?;
            if let Some(inverse) = candidate.invert()? {
                return Ok((candidate, inverse));
            }
            debug!(attempt, dimension = n, "discarding singular random matrix");
        }
        debug!(
            attempts = max_attempts,
            dimension = n,
            "rejection sampling exhausted its attempts"
        );
        Err(MatrixError::RetryLimitExceeded {
            attempts: max_attempts,
        })
    }

    /// Draws a uniformly random invertible `n×n` matrix one row at a time and
    /// returns it with its inverse.
    pub fn random_invertible<R: RngCore + CryptoRng>(
        rng: &mut R,
        n: usize,
    ) -> Result<(Self, Self)> {
        let mut builder = IncrementalMatrix::new(n)?;
        while !builder.fully_defined() {
            let row = builder.novel(rng)?;
            builder.add(&row)?;
        }
        let inverse = builder.inverse()?;
        Ok((builder.matrix(), inverse))
    }

    /// Uniformly random `n×n` matrix, not necessarily invertible.
    fn uniform<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Result<Self> {
        let rows = (0..n)
            .map(|_| Row::random(rng, n))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows, cols: n })
    }

    /// `(rows, cols)`.
    pub fn size(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    /// The rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row `index`, if present.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Consumes the matrix and returns its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Applies the matrix to a column vector: output bit `i` is row `i` · `input`.
    ///
    /// The row count must be a multiple of eight.
    pub fn apply(&self, input: &Row) -> Result<Row> {
        if input.len() != self.cols {
            return Err(MatrixError::ShapeMismatch {
                left: self.size(),
                right: (input.len(), 1),
            });
        }
        let mut out = Row::zero(self.rows.len())?;
        for (idx, row) in self.rows.iter().enumerate() {
            if row.dot_unchecked(input) {
                out.set_bit(idx, true);
            }
        }
        Ok(out)
    }

    /// Applies the matrix to a packed byte buffer.
    pub fn apply_to_bytes(&self, input: &[u8]) -> Result<Vec<u8>> {
        let out = self.apply(&Row::from_bytes(input))?;
        Ok(out.as_bytes().to_vec())
    }

    /// Entry-wise XOR of two matrices of identical shape.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.size() != other.size() {
            return Err(MatrixError::ShapeMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        let rows = self
            .rows
            .iter()
            .zip(other.rows.iter())
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rows,
            cols: self.cols,
        })
    }

    /// Matrix product `self × rhs`, the map that applies `rhs` first.
    pub fn compose(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows.len() {
            return Err(MatrixError::ShapeMismatch {
                left: self.size(),
                right: rhs.size(),
            });
        }
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut acc = Row::zero(rhs.cols)?;
            for (k, source) in rhs.rows.iter().enumerate() {
                if row.bit(k) {
                    acc.xor_assign(source);
                }
            }
            rows.push(acc);
        }
        Ok(Self {
            rows,
            cols: rhs.cols,
        })
    }

    /// Returns the transpose. The row count must be a multiple of eight.
    pub fn transpose(&self) -> Result<Self> {
        let mut rows = vec![Row::zero(self.rows.len())?; self.cols];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, out) in rows.iter_mut().enumerate() {
                if row.bit(j) {
                    out.set_bit(i, true);
                }
            }
        }
        Ok(Self {
            rows,
            cols: self.rows.len(),
        })
    }

    /// Inverts the matrix by Gauss-Jordan elimination.
    ///
    /// Works on a private copy; `Ok(None)` means the matrix is singular.
    pub fn invert(&self) -> Result<Option<Self>> {
        let n = self.check_square()?;
        let mut left = self.rows.clone();
        let mut right = Self::identity(n)?.rows;

        for col in 0..n {
            let pivot = left
                .iter()
                .enumerate()
                .skip(col)
                .find(|(_, row)| row.bit(col))
                .map(|(idx, _)| idx);
            let Some(pivot) = pivot else {
                return Ok(None);
            };
            if pivot != col {
                left.swap(pivot, col);
                right.swap(pivot, col);
            }
            for row in 0..n {
                if row != col && left[row].bit(col) {
                    xor_row_into(&mut left, row, col);
                    xor_row_into(&mut right, row, col);
                }
            }
        }

        Ok(Some(Self {
            rows: right,
            cols: n,
        }))
    }

    /// Returns true if the matrix is square and invertible.
    pub fn is_invertible(&self) -> Result<bool> {
        Ok(self.invert()?.is_some())
    }

    /// XOR of the diagonal entries.
    pub fn trace(&self) -> Result<bool> {
        let n = self.check_square()?;
        Ok((0..n).fold(false, |acc, i| acc ^ self.rows[i].bit(i)))
    }

    fn check_square(&self) -> Result<usize> {
        let (rows, cols) = self.size();
        if rows != cols {
            return Err(MatrixError::NonSquare { rows, cols });
        }
        Ok(rows)
    }
}

/// `rows[dst] ^= rows[src]` for `dst != src`.
fn xor_row_into(rows: &mut [Row], dst: usize, src: usize) {
    debug_assert_ne!(dst, src);
    if dst < src {
        let (head, tail) = rows.split_at_mut(src);
        head[dst].xor_assign(&tail[0]);
    } else {
        let (head, tail) = rows.split_at_mut(dst);
        tail[0].xor_assign(&head[src]);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows.len())
            .field("cols", &self.cols)
            .field("data", &self.rows)
            .finish()
    }
}
