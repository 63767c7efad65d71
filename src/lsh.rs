//! Multi-table LSH index: bulk-inserts neurons by their current weight
//! snapshot into per-table bucket multimaps, and retrieves a sparsity-sized
//! candidate set by visiting tables in random order and unioning their
//! buckets with early termination once enough candidates are found.
use crate::data::Numeric;
use crate::error::{Error, Result};
use crate::hash::{HashCode, HashFactory, VecHash};
use crate::neuron::Neuron;
use crate::utils::{create_rng, index_vec};
use fnv::{FnvHashMap, FnvHashSet};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::sync::Arc;

pub struct Lsh<T: Numeric> {
    l: usize,
    data_size: usize,
    factory: Arc<dyn HashFactory<T>>,
    hash: Vec<Box<dyn VecHash<T>>>,
    bucket: Vec<FnvHashMap<HashCode, FnvHashSet<u32>>>,
    neuron_size: usize,
    sparsity: T,
    seed: u64,
}

impl<T: Numeric> Lsh<T> {
    pub fn new(
        l: usize,
        data_size: usize,
        factory: Arc<dyn HashFactory<T>>,
        sparsity: T,
        seed: u64,
    ) -> Result<Self> {
        if !(T::zero() < sparsity && sparsity <= T::one()) {
            return Err(Error::InvalidHashConfig(
                "sparsity must be in (0, 1]".to_string(),
            ));
        }
        let hash = (0..l)
            .map(|t| factory.get_hash(data_size, Self::table_seed(seed, t)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Lsh {
            l,
            data_size,
            factory,
            hash,
            bucket: (0..l).map(|_| FnvHashMap::default()).collect(),
            neuron_size: 0,
            sparsity,
            seed,
        })
    }

    fn table_seed(seed: u64, table: usize) -> u64 {
        if seed == 0 {
            0
        } else {
            seed.wrapping_mul(2_654_435_761).wrapping_add(table as u64 + 1)
        }
    }

    /// Rebuilds every hash from the factory and clears every table.
    pub fn reset(&mut self) -> Result<()> {
        self.hash = (0..self.l)
            .map(|t| {
                self.factory
                    .get_hash(self.data_size, Self::table_seed(self.seed.wrapping_add(1), t))
            })
            .collect::<Result<Vec<_>>>()?;
        self.bucket = (0..self.l).map(|_| FnvHashMap::default()).collect();
        self.neuron_size = 0;
        Ok(())
    }

    /// Bulk-inserts every neuron's current weight snapshot into every table.
    pub fn add(&mut self, neurons: &[Neuron<T>]) -> Result<()> {
        let snapshots: Vec<_> = neurons.iter().map(|n| n.w()).collect();
        let buckets: Vec<FnvHashMap<HashCode, FnvHashSet<u32>>> = self
            .hash
            .par_iter()
            .map(|h| -> Result<FnvHashMap<HashCode, FnvHashSet<u32>>> {
                let mut table = FnvHashMap::default();
                for (n, snapshot) in snapshots.iter().enumerate() {
                    let code = h.encode(snapshot)?;
                    table.entry(code).or_insert_with(FnvHashSet::default).insert(n as u32);
                }
                Ok(table)
            })
            .collect::<Result<Vec<_>>>()?;
        self.bucket = buckets;
        self.neuron_size = neurons.len();
        Ok(())
    }

    /// Union-with-early-termination candidate retrieval.
    pub fn retrieve(&self, x: &crate::data::Data<T>) -> Result<Vec<u32>> {
        if self.neuron_size == 0 {
            return Ok(Vec::new());
        }
        let threshold = ((T::from_usize(self.neuron_size).unwrap() * self.sparsity)
            .to_usize()
            .unwrap_or(0))
        .max(1);

        let mut order = index_vec(self.l);
        let mut rng = create_rng(self.seed.wrapping_add(0x9E37_79B9));
        order.shuffle(&mut rng);

        let mut accum: FnvHashSet<u32> = FnvHashSet::default();
        for t in order {
            let code = self.hash[t as usize].encode(x)?;
            if let Some(bucket) = self.bucket[t as usize].get(&code) {
                accum.extend(bucket.iter().copied());
            }
            if accum.len() >= threshold {
                break;
            }
        }
        Ok(accum.into_iter().collect())
    }

    pub fn neuron_size(&self) -> usize {
        self.neuron_size
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::Data;
    use crate::hash::WtaFactory;
    use crate::optimizer::Optimizer;

    fn neurons(n: usize, prev_units: usize) -> Vec<Neuron<f32>> {
        let opt = Optimizer::<f32>::sgd(1.0, 1.0);
        (0..n).map(|_| Neuron::new(prev_units, &opt)).collect()
    }

    #[test]
    fn retrieve_before_add_is_empty() {
        let lsh = Lsh::<f32>::new(4, 8, Arc::new(WtaFactory::new(2, 4)), 0.5, 1).unwrap();
        let x: Data<f32> = Data::zeros(8);
        assert_eq!(lsh.retrieve(&x).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn retrieve_after_reset_is_empty() {
        let mut lsh = Lsh::<f32>::new(4, 8, Arc::new(WtaFactory::new(2, 4)), 0.5, 1).unwrap();
        lsh.add(&neurons(5, 8)).unwrap();
        lsh.reset().unwrap();
        let x: Data<f32> = Data::zeros(8);
        assert_eq!(lsh.retrieve(&x).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn retrieve_returns_subset_of_neuron_ids() {
        let mut lsh = Lsh::<f32>::new(8, 8, Arc::new(WtaFactory::new(4, 4)), 0.5, 7).unwrap();
        let ns = neurons(10, 8);
        lsh.add(&ns).unwrap();
        let x: Data<f32> = Data::from((0..8).map(|i| i as f32).collect::<Vec<_>>());
        let ids = lsh.retrieve(&x).unwrap();
        assert!(ids.iter().all(|&id| (id as usize) < 10));
    }

    #[test]
    fn rejects_sparsity_out_of_range() {
        assert!(Lsh::<f32>::new(4, 8, Arc::new(WtaFactory::new(2, 4)), 0.0, 1).is_err());
        assert!(Lsh::<f32>::new(4, 8, Arc::new(WtaFactory::new(2, 4)), 1.5, 1).is_err());
    }
}
