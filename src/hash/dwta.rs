use super::wta::Wta;
use super::{bits_for, HashCode, VecHash};
use crate::data::{Data, Numeric};
use crate::error::{Error, Result};
use crate::utils::create_rng;
use rand::Rng;

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Densified WTA: like [`Wta`], but a bin whose argmax value is exactly zero
/// is rescued by probing other bins via a universal hash, instead of
/// packing a meaningless index.
pub struct Dwta {
    base: Wta,
    max_attempt: usize,
    attempt_bits: u32,
    coprime: usize,
}

impl Dwta {
    pub fn new(
        bin_size: usize,
        data_size: usize,
        sample_size: usize,
        max_attempt: usize,
        seed: u64,
    ) -> Result<Self> {
        let base = Wta::new(bin_size, data_size, sample_size, seed)?;
        let attempt_bits = bits_for(max_attempt);
        let mut rng = create_rng(seed.wrapping_add(1));
        let mut coprime = rng.gen_range(1..=usize::MAX);
        while gcd(sample_size, coprime) != 1 {
            coprime = rng.gen_range(1..=usize::MAX);
        }
        Ok(Dwta {
            base,
            max_attempt,
            attempt_bits,
            coprime,
        })
    }

    fn universal_hash(&self, i: usize, attempt: usize) -> usize {
        let x = (i << self.attempt_bits).wrapping_add(attempt);
        x.wrapping_mul(self.coprime) % self.base.sample_size()
    }
}

impl<T: Numeric> VecHash<T> for Dwta {
    fn encode(&self, data: &Data<T>) -> Result<HashCode> {
        if data.len() != <Wta as VecHash<T>>::data_size(&self.base) {
            return Err(Error::DimensionMismatch {
                expected: <Wta as VecHash<T>>::data_size(&self.base),
                found: data.len(),
            });
        }
        let (max_vs, max_is) = self.base.argmaxes(data);

        let mut code: HashCode = 0;
        for b in 0..self.base.bin_size() {
            let packed = if max_vs[b] != T::zero() {
                max_is[b]
            } else {
                let mut next = b;
                for attempt in 0..self.max_attempt {
                    next = self.universal_hash(b, attempt);
                    if max_vs[next] != T::zero() {
                        break;
                    }
                }
                max_is[next]
            };
            code = (code << self.base.sample_bits()) | packed as HashCode;
        }
        Ok(code)
    }

    fn data_size(&self) -> usize {
        <Wta as VecHash<T>>::data_size(&self.base)
    }
}
