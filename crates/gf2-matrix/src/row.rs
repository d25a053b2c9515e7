//! Packed GF(2) row vectors.

use core::fmt;

use rand::{CryptoRng, RngCore};

use crate::error::{check_aligned, MatrixError, Result};
use crate::parity::parity_of;

/// Fixed-length bit vector over GF(2), packed eight bits per byte.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8` (little-endian within
/// each byte). The length is always a multiple of eight.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Row {
    bytes: Vec<u8>,
}

impl Row {
    /// Returns the all-zero row of `bits` bits.
    pub fn zero(bits: usize) -> Result<Self> {
        check_aligned(bits)?;
        Ok(Self {
            bytes: vec![0u8; bits / 8],
        })
    }

    /// Returns the row with only bit `index` set.
    pub fn unit(bits: usize, index: usize) -> Result<Self> {
        let mut row = Self::zero(bits)?;
        if index >= bits {
            return Err(MatrixError::BitOutOfRange { index, len: bits });
        }
        row.set_bit(index, true);
        Ok(row)
    }

    /// Wraps packed bytes as a row.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Parses a row from its hex rendering (byte 0 first).
    pub fn from_hex(text: &str) -> Result<Self> {
        hex::decode(text.trim())
            .map(Self::from_bytes)
            .map_err(|err| MatrixError::InvalidHex(err.to_string()))
    }

    /// Draws a uniformly random row of `bits` bits.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, bits: usize) -> Result<Self> {
        let mut row = Self::zero(bits)?;
        rng.fill_bytes(&mut row.bytes);
        Ok(row)
    }

    /// Packed bytes backing the row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bits.
    pub fn len(&self) -> usize {
        8 * self.bytes.len()
    }

    /// Returns true for the zero-length row.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Element-wise XOR (addition over GF(2)).
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        let bytes = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self { bytes })
    }

    /// Element-wise AND (multiplication over GF(2)).
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        let bytes = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| a & b)
            .collect();
        Ok(Self { bytes })
    }

    /// GF(2) inner product: parity of `self & other`.
    pub fn dot_product(&self, other: &Self) -> Result<bool> {
        self.check_same_len(other)?;
        Ok(self.dot_unchecked(other))
    }

    /// Hamming weight.
    pub fn weight(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Reads bit `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn bit(&self, index: usize) -> bool {
        (self.bytes[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Sets bit `index` to `value`, touching storage only when the bit changes.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if self.bit(index) != value {
            self.bytes[index / 8] ^= 1u8 << (index % 8);
        }
    }

    /// Returns true if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Index of the lowest set bit, if any.
    pub fn first_set_bit(&self) -> Option<usize> {
        self.bytes
            .iter()
            .enumerate()
            .find(|&(_, &b)| b != 0)
            .map(|(idx, b)| idx * 8 + b.trailing_zeros() as usize)
    }

    /// In-place XOR for rows already known to share a length.
    pub(crate) fn xor_assign(&mut self, other: &Self) {
        debug_assert_eq!(self.bytes.len(), other.bytes.len());
        for (d, s) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *d ^= *s;
        }
    }

    pub(crate) fn dot_unchecked(&self, other: &Self) -> bool {
        let product: Vec<u8> = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| a & b)
            .collect();
        parity_of(&product)
    }

    fn check_same_len(&self, other: &Self) -> Result<()> {
        if self.bytes.len() != other.bytes.len() {
            return Err(MatrixError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn add_is_self_inverse() {
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        for _ in 0..32 {
            let a = Row::random(&mut rng, 64).unwrap();
            let b = Row::random(&mut rng, 64).unwrap();
            assert_eq!(a.add(&b).unwrap().add(&b).unwrap(), a);
            assert!(a.add(&a).unwrap().is_zero());
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = Row::zero(16).unwrap();
        let b = Row::zero(24).unwrap();
        let expected = MatrixError::LengthMismatch {
            left: 16,
            right: 24,
        };
        assert_eq!(a.add(&b), Err(expected.clone()));
        assert_eq!(a.mul(&b), Err(expected.clone()));
        assert_eq!(a.dot_product(&b), Err(expected));
    }

    #[test]
    fn unaligned_length_is_rejected() {
        assert_eq!(
            Row::zero(12),
            Err(MatrixError::UnalignedDimension { bits: 12 })
        );
    }

    #[test]
    fn dot_product_matches_bitwise_sum() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for _ in 0..64 {
            let a = Row::random(&mut rng, 128).unwrap();
            let b = Row::random(&mut rng, 128).unwrap();
            let expected = (0..128).filter(|&i| a.bit(i) && b.bit(i)).count() % 2 == 1;
            assert_eq!(a.dot_product(&b).unwrap(), expected);
        }
    }

    #[test]
    fn set_bit_only_touches_target() {
        let mut row = Row::from_bytes(vec![0b1010_0101, 0xff]);
        row.set_bit(0, true);
        assert_eq!(row.as_bytes(), &[0b1010_0101, 0xff]);
        row.set_bit(1, true);
        assert_eq!(row.as_bytes(), &[0b1010_0111, 0xff]);
        row.set_bit(15, false);
        assert_eq!(row.as_bytes(), &[0b1010_0111, 0x7f]);
        row.set_bit(15, false);
        assert_eq!(row.as_bytes(), &[0b1010_0111, 0x7f]);
    }

    #[test]
    fn weight_and_first_set_bit() {
        let row = Row::from_bytes(vec![0x00, 0b0001_0100, 0x80]);
        assert_eq!(row.len(), 24);
        assert_eq!(row.weight(), 3);
        assert_eq!(row.first_set_bit(), Some(10));
        assert_eq!(Row::zero(24).unwrap().first_set_bit(), None);
    }

    #[test]
    fn hex_rendering_roundtrips() {
        let row = Row::from_hex("0a1bff").unwrap();
        assert_eq!(row.to_string(), "0a1bff");
        assert!(Row::from_hex("zz").is_err());
    }
}
