//! Deterministic random number generation.
//!
//! Every random step (sharing rolls, relay noise, spiral rotation) draws from
//! one explicitly threaded [`TacticsRng`]. There is no global generator, so a
//! fixed seed and fixed inputs replay identically.

use rand::SeedableRng;

/// The generator threaded through tactical computations.
pub type TacticsRng = rand_chacha::ChaCha8Rng;

/// Creates the generator for a configuration seed.
pub fn seeded(seed: u64) -> TacticsRng {
    TacticsRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        let xs: Vec<u32> = (0..8).map(|_| a.r#gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.r#gen()).collect();
        assert_eq!(xs, ys);
    }
}
