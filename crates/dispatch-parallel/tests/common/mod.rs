//! Shared utilities for integration tests

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lengths around the block boundaries the device backend launches with
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,   // Empty
        1,   // Single element
        7,   // Below one small block
        255, // One default block - 1
        256, // One default block
        257, // One default block + 1
        1000,
        4099, // Prime, several blocks with a remainder
    ]
}

/// Seeded integer test data
pub fn generate_test_data(seed: u64, len: usize) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-10_000..10_000)).collect()
}

/// Seeded boolean stencil with roughly `density` of its entries set
pub fn generate_stencil(seed: u64, len: usize, density: f64) -> Vec<bool> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_bool(density)).collect()
}
