use gf2_matrix::{IncrementalMatrix, Matrix, Row};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn incremental_matches_whole_matrix_inversion() {
    let mut rng = ChaCha20Rng::from_seed([60u8; 32]);
    let m = Matrix::random(&mut rng, 128).expect("invertible draw");
    let m_inv = m.invert().unwrap().expect("invertible");

    let mut im = IncrementalMatrix::new(128).unwrap();
    for row in &m.rows()[..126] {
        assert!(im.add(row).unwrap(), "failed to add row from invertible matrix");
    }
    assert!(!im.fully_defined());

    let rows = m.rows();
    let redundant_a = rows[3]
        .add(&rows[6])
        .and_then(|r| r.add(&rows[100]))
        .and_then(|r| r.add(&rows[121]))
        .unwrap();
    let redundant_b = rows[8]
        .add(&rows[73])
        .and_then(|r| r.add(&rows[98]))
        .and_then(|r| r.add(&rows[100]))
        .unwrap();

    let snapshot = im.clone();
    assert!(!im.add(&redundant_a).unwrap());
    assert!(!im.add(&redundant_b).unwrap());
    assert_eq!(im.len(), 126);
    assert_eq!(im, snapshot, "dependent rows mutated the builder");
    assert!(!im.fully_defined());

    for row in &m.rows()[126..] {
        assert!(im.add(row).unwrap());
    }
    assert!(im.fully_defined());

    assert_eq!(im.matrix(), m);
    assert_eq!(im.inverse().unwrap(), m_inv);
}

#[test]
fn fully_defined_tracks_rank() {
    let mut rng = ChaCha20Rng::from_seed([61u8; 32]);
    let n = 32;
    let mut im = IncrementalMatrix::new(n).unwrap();
    while !im.fully_defined() {
        assert!(im.len() < n);
        let row = Row::random(&mut rng, n).unwrap();
        im.add(&row).unwrap();
    }
    assert_eq!(im.len(), n);
    let row = Row::random(&mut rng, n).unwrap();
    im.add(&row).unwrap();
    assert!(im.fully_defined());
    assert_eq!(im.len(), n);
}

#[test]
fn novel_rows_are_outside_span() {
    let mut rng = ChaCha20Rng::from_seed([62u8; 32]);
    let mut im = IncrementalMatrix::new(128).unwrap();
    while im.len() < 126 {
        let row = Row::random(&mut rng, 128).unwrap();
        im.add(&row).unwrap();
    }
    for _ in 0..100 {
        let candidate = im.novel(&mut rng).unwrap();
        assert!(!im.is_in_span(&candidate).unwrap());
    }
}

#[test]
fn novel_drives_every_add_to_success() {
    let mut rng = ChaCha20Rng::from_seed([63u8; 32]);
    let mut im = IncrementalMatrix::new(64).unwrap();
    for rank in 0..64 {
        assert_eq!(im.len(), rank);
        let row = im.novel(&mut rng).unwrap();
        assert!(im.add(&row).unwrap());
    }
    let m = im.matrix();
    let inv = im.inverse().unwrap();
    let identity = Matrix::identity(64).unwrap();
    assert_eq!(m.compose(&inv).unwrap(), identity);
    assert_eq!(inv.compose(&m).unwrap(), identity);
}
