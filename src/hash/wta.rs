use super::{bits_for, sample_theta, HashCode, VecHash};
use crate::data::{Data, Numeric};
use crate::error::{Error, Result};
use crate::utils::create_rng;

/// Winner-Take-All hash: packs, for each of `bin_size` bins, the argmax
/// index (ties to the lowest index) over a `sample_size`-wide random subset
/// of the `data_size` input dimensions.
pub struct Wta {
    bin_size: usize,
    data_size: usize,
    sample_size: usize,
    sample_bits: u32,
    theta: Vec<Vec<usize>>,
}

impl Wta {
    pub fn new(bin_size: usize, data_size: usize, sample_size: usize, seed: u64) -> Result<Self> {
        if data_size < sample_size {
            return Err(Error::InvalidHashConfig(format!(
                "sample_size ({sample_size}) must not exceed data_size ({data_size})"
            )));
        }
        let sample_bits = bits_for(sample_size);
        if (bin_size as u64) * (sample_bits as u64) > 64 {
            return Err(Error::InvalidHashConfig(format!(
                "bin_size ({bin_size}) * sample_bits ({sample_bits}) exceeds 64 bits"
            )));
        }
        let mut rng = create_rng(seed);
        let theta = sample_theta(bin_size, data_size, sample_size, &mut rng);
        Ok(Wta {
            bin_size,
            data_size,
            sample_size,
            sample_bits,
            theta,
        })
    }

    /// Per-bin `(max_value, argmax_index)`, shared verbatim by [`super::Dwta`].
    pub(super) fn argmaxes<T: Numeric>(&self, data: &Data<T>) -> (Vec<T>, Vec<usize>) {
        let mut max_vs = Vec::with_capacity(self.bin_size);
        let mut max_is = Vec::with_capacity(self.bin_size);
        for bin in &self.theta {
            let mut max_v = T::min_value();
            let mut max_i = 0usize;
            for (i, &dim) in bin.iter().enumerate().take(self.sample_size) {
                let v = data[dim];
                if v > max_v {
                    max_v = v;
                    max_i = i;
                }
            }
            max_vs.push(max_v);
            max_is.push(max_i);
        }
        (max_vs, max_is)
    }

    pub(super) fn sample_bits(&self) -> u32 {
        self.sample_bits
    }

    pub(super) fn bin_size(&self) -> usize {
        self.bin_size
    }

    pub(super) fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl<T: Numeric> VecHash<T> for Wta {
    fn encode(&self, data: &Data<T>) -> Result<HashCode> {
        if data.len() != self.data_size {
            return Err(Error::DimensionMismatch {
                expected: self.data_size,
                found: data.len(),
            });
        }
        let (_max_vs, max_is) = self.argmaxes(data);
        let mut code: HashCode = 0;
        for max_i in max_is {
            code = (code << self.sample_bits) | max_i as HashCode;
        }
        Ok(code)
    }

    fn data_size(&self) -> usize {
        self.data_size
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_is_deterministic_for_a_given_instance() {
        let h = Wta::new(8, 16, 4, 42).unwrap();
        let x: Data<f32> = Data::from((0..16).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(h.encode(&x).unwrap(), h.encode(&x).unwrap());
    }

    #[test]
    fn encode_of_zero_vector_is_zero() {
        let h = Wta::new(8, 16, 4, 42).unwrap();
        let x: Data<f32> = Data::zeros(16);
        assert_eq!(h.encode(&x).unwrap(), 0);
    }

    #[test]
    fn rejects_sample_size_larger_than_data_size() {
        assert!(Wta::new(8, 4, 8, 1).is_err());
    }

    #[test]
    fn rejects_overflowing_bit_budget() {
        // sample_bits for K=100 is 7; 64 bins * 7 > 64.
        assert!(Wta::new(64, 200, 100, 1).is_err());
    }

    #[test]
    fn encode_rejects_dimension_mismatch() {
        let h = Wta::new(4, 8, 2, 1).unwrap();
        let x: Data<f32> = Data::zeros(4);
        assert!(matches!(
            h.encode(&x),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
