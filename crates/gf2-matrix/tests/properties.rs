use gf2_matrix::{IncrementalMatrix, Matrix, Row};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Byte-aligned row lengths up to 64 bits.
fn arb_row_pair() -> impl Strategy<Value = (Row, Row)> {
    (1usize..=8).prop_flat_map(|bytes| {
        (
            proptest::collection::vec(any::<u8>(), bytes),
            proptest::collection::vec(any::<u8>(), bytes),
        )
            .prop_map(|(a, b)| (Row::from_bytes(a), Row::from_bytes(b)))
    })
}

fn arb_dimension() -> impl Strategy<Value = usize> {
    prop_oneof![Just(8usize), Just(16), Just(32)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_xor_is_self_inverse((a, b) in arb_row_pair()) {
        prop_assert_eq!(a.add(&b).unwrap().add(&b).unwrap(), a.clone());
        prop_assert!(a.add(&a).unwrap().is_zero());
    }

    #[test]
    fn prop_dot_product_is_parity_of_and((a, b) in arb_row_pair()) {
        let product = a.mul(&b).unwrap();
        prop_assert_eq!(a.dot_product(&b).unwrap(), product.weight() % 2 == 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_inverse_is_two_sided(seed in any::<[u8; 32]>(), n in arb_dimension()) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let (m, inv) = Matrix::random_invertible(&mut rng, n).unwrap();
        let identity = Matrix::identity(n).unwrap();
        prop_assert_eq!(m.compose(&inv).unwrap(), identity.clone());
        prop_assert_eq!(inv.compose(&m).unwrap(), identity);
        prop_assert_eq!(m.invert().unwrap(), Some(inv));
    }

    #[test]
    fn prop_incremental_agrees_with_invert(seed in any::<[u8; 32]>(), n in arb_dimension()) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let m = Matrix::random(&mut rng, n).unwrap();
        let mut im = IncrementalMatrix::new(n).unwrap();
        for row in m.rows() {
            prop_assert!(im.add(row).unwrap());
        }
        prop_assert_eq!(im.matrix(), m.clone());
        prop_assert_eq!(Some(im.inverse().unwrap()), m.invert().unwrap());
    }
}
