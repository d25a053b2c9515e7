//! Masks a 32-bit word with a random invertible matrix and unmasks it again.

use gf2_matrix::{Generator, Matrix};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn main() -> gf2_matrix::Result<()> {
    // Deterministic seed for reproducibility in the example.
    let mut gen = Generator::new(ChaCha20Rng::from_seed([1u8; 32]));

    // Byte rotation stands in for a cipher's linear layer.
    let layer = Matrix::from_linear_map(32, |word| word.rotate_left(1))?;
    let (mask, unmask, masked_layer) = gen.mask(&layer)?;

    let word = *b"wbox";
    let hidden = masked_layer.apply_to_bytes(&word)?;
    let recovered = unmask.apply_to_bytes(&hidden)?;
    assert_eq!(recovered, layer.apply_to_bytes(&word)?);
    assert_eq!(mask.compose(&unmask)?, Matrix::identity(32)?);

    println!("masked layer:\n{masked_layer}");
    println!("example succeeded; unmasking recovers the layer output");
    Ok(())
}
