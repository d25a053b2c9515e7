//! Exact linear algebra over GF(2) for white-box AES masking.
//!
//! This crate provides packed bit vectors ([`Row`]), bit matrices
//! ([`Matrix`]) with Gauss-Jordan inversion, and an incremental builder
//! ([`IncrementalMatrix`]) that grows a random invertible matrix one
//! independent row at a time while tracking its inverse. Key-generation code
//! uses these as masking and unmasking linear maps.
//!
//! All dimensions are multiples of eight bits.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod generator;
mod incremental;
mod matrix;
mod parity;
mod row;

pub use error::{MatrixError, Result};
pub use generator::{GenerationStrategy, Generator, GeneratorConfig};
pub use incremental::IncrementalMatrix;
pub use matrix::{Matrix, DEFAULT_MAX_ATTEMPTS};
pub use row::Row;
