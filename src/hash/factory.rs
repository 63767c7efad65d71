use super::{Dwta, VecHash, Wta};
use crate::data::Numeric;
use crate::error::Result;

/// Builds a fresh hash bound to a given input dimension, clamping
/// `sample_size` to `data_size` when the caller asked for more samples than
/// the data has dimensions.
pub trait HashFactory<T: Numeric>: Send + Sync {
    fn get_hash(&self, data_size: usize, seed: u64) -> Result<Box<dyn VecHash<T>>>;
}

pub struct WtaFactory {
    pub bin_size: usize,
    pub sample_size: usize,
}

impl WtaFactory {
    pub fn new(bin_size: usize, sample_size: usize) -> Self {
        WtaFactory {
            bin_size,
            sample_size,
        }
    }
}

impl<T: Numeric> HashFactory<T> for WtaFactory {
    fn get_hash(&self, data_size: usize, seed: u64) -> Result<Box<dyn VecHash<T>>> {
        let sample_size = self.sample_size.min(data_size);
        Ok(Box::new(Wta::new(
            self.bin_size,
            data_size,
            sample_size,
            seed,
        )?))
    }
}

pub struct DwtaFactory {
    pub bin_size: usize,
    pub sample_size: usize,
    pub max_attempt: usize,
}

impl DwtaFactory {
    pub fn new(bin_size: usize, sample_size: usize) -> Self {
        DwtaFactory {
            bin_size,
            sample_size,
            max_attempt: 100,
        }
    }

    pub fn with_max_attempt(bin_size: usize, sample_size: usize, max_attempt: usize) -> Self {
        DwtaFactory {
            bin_size,
            sample_size,
            max_attempt,
        }
    }
}

impl<T: Numeric> HashFactory<T> for DwtaFactory {
    fn get_hash(&self, data_size: usize, seed: u64) -> Result<Box<dyn VecHash<T>>> {
        let sample_size = self.sample_size.min(data_size);
        Ok(Box::new(Dwta::new(
            self.bin_size,
            data_size,
            sample_size,
            self.max_attempt,
            seed,
        )?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wta_factory_clamps_sample_size_to_data_size() {
        let factory = WtaFactory::new(4, 100);
        let hash: Box<dyn VecHash<f32>> = factory.get_hash(10, 1).unwrap();
        assert_eq!(hash.data_size(), 10);
    }

    #[test]
    fn dwta_factory_defaults_max_attempt_to_100() {
        let factory = DwtaFactory::new(4, 2);
        assert_eq!(factory.max_attempt, 100);
    }
}
