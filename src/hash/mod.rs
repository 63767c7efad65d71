//! WTA/DWTA hash families and their factories.
mod dwta;
mod factory;
mod wta;

pub use dwta::Dwta;
pub use factory::{DwtaFactory, HashFactory, WtaFactory};
pub use wta::Wta;

use crate::data::{Data, Numeric};
use crate::error::Result;

pub type HashCode = u64;

/// Maps a `Data<T>` to a 64-bit code. Stateless after construction:
/// `encode` never mutates the hash.
pub trait VecHash<T: Numeric>: Send + Sync {
    fn encode(&self, data: &Data<T>) -> Result<HashCode>;
    fn data_size(&self) -> usize;
}

fn bits_for(n: usize) -> u32 {
    let mut bits = 1u32;
    let mut power = 2usize;
    while n > power {
        bits += 1;
        power *= 2;
    }
    bits
}

/// Draws `bin_size` independent length-`sample_size` samples of
/// `0..data_size`, each a fresh Fisher-Yates shuffle truncated to the first
/// `sample_size` entries.
fn sample_theta(
    bin_size: usize,
    data_size: usize,
    sample_size: usize,
    rng: &mut impl rand::Rng,
) -> Vec<Vec<usize>> {
    use rand::seq::SliceRandom;
    let mut index: Vec<usize> = (0..data_size).collect();
    (0..bin_size)
        .map(|_| {
            index.shuffle(rng);
            index[..sample_size].to_vec()
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bits_for_matches_ceil_log2() {
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(4), 2);
        assert_eq!(bits_for(5), 3);
        assert_eq!(bits_for(100), 7);
    }
}
