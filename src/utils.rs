//! RNG seeding and small index helpers shared across hash, layer, and
//! scheduler construction.
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Seeds a fast, non-cryptographic RNG. `seed == 0` draws entropy from the
/// OS so two unseeded constructions don't collide; any other value is
/// reproducible.
pub fn create_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

/// `0..n` as a `Vec`, used for identity active-sets (Input/Output layers)
/// and table-visit orderings.
pub fn index_vec(n: usize) -> Vec<u32> {
    (0..n as u32).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_vec_is_identity() {
        assert_eq!(index_vec(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn create_rng_is_reproducible_for_nonzero_seed() {
        use rand::Rng;
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xs: Vec<u32> = (0..5).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..5).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }
}
