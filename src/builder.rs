//! Fluent `Network` construction via chained `&mut self` setters, finished
//! off by `build()`.
use crate::activation::Activation;
use crate::data::Numeric;
use crate::error::Result;
use crate::hash::{HashFactory, WtaFactory};
use crate::initializer::Initializer;
use crate::layer::Layer;
use crate::network::Network;
use crate::optimizer::Optimizer;
use crate::scheduler::Scheduler;
use std::sync::Arc;

pub struct NetworkBuilder<T: Numeric> {
    input_size: usize,
    hidden_units: Vec<usize>,
    l: usize,
    hash_factory: Option<Arc<dyn HashFactory<T>>>,
    optimizer: Option<Arc<Optimizer<T>>>,
    scheduler: Option<Scheduler>,
    activation: Activation,
    initializer: Initializer<T>,
    l1: T,
    l2: T,
    sparsity: T,
    seed: u64,
}

impl<T: Numeric> NetworkBuilder<T> {
    pub fn new(input_size: usize) -> Self {
        NetworkBuilder {
            input_size,
            hidden_units: Vec::new(),
            l: 50,
            hash_factory: None,
            optimizer: None,
            scheduler: None,
            activation: Activation::default(),
            initializer: Initializer::default(),
            l1: T::zero(),
            l2: T::zero(),
            sparsity: T::from_f64(0.5).unwrap(),
            seed: 0,
        }
    }

    pub fn hidden_units(mut self, units: Vec<usize>) -> Self {
        self.hidden_units = units;
        self
    }

    pub fn hash_tables(mut self, l: usize) -> Self {
        self.l = l;
        self
    }

    pub fn hash_factory(mut self, factory: Arc<dyn HashFactory<T>>) -> Self {
        self.hash_factory = Some(factory);
        self
    }

    pub fn optimizer(mut self, optimizer: Arc<Optimizer<T>>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn rehash_schedule(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn initializer(mut self, initializer: Initializer<T>) -> Self {
        self.initializer = initializer;
        self
    }

    pub fn regularization(mut self, l1: T, l2: T) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    pub fn sparsity(mut self, sparsity: T) -> Self {
        self.sparsity = sparsity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<Network<T>> {
        let optimizer = self
            .optimizer
            .unwrap_or_else(|| Optimizer::adam_default(T::from_f64(0.001).unwrap()));
        let scheduler = match self.scheduler {
            Some(s) => s,
            None => Scheduler::constant_frequency(50)?,
        };

        let output_dim = self.hidden_units.last().copied().unwrap_or(self.input_size);
        let factory: Arc<dyn HashFactory<T>> = self
            .hash_factory
            .unwrap_or_else(|| Arc::new(WtaFactory::new(8, 8)));

        let mut layers = Vec::with_capacity(self.hidden_units.len() + 2);
        layers.push(Layer::input(self.input_size));

        let mut prev_units = self.input_size;
        for (idx, &units) in self.hidden_units.iter().enumerate() {
            let mut sampler = self.initializer.sampler();
            let dense = Layer::dense(
                prev_units,
                units,
                self.activation,
                self.l,
                Arc::clone(&factory),
                &optimizer,
                sampler.as_mut(),
                self.l1,
                self.l2,
                self.sparsity,
                self.seed.wrapping_add(idx as u64 + 1),
            )?;
            layers.push(dense);
            prev_units = units;
        }
        layers.push(Layer::output(prev_units));

        Network::new(layers, output_dim, optimizer, scheduler)
    }
}
