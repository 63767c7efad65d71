//! `Weight`: one bias plus one [`Parameter`] per input unit.
use crate::data::{Data, Numeric};
use crate::optimizer::Optimizer;
use crate::param::Parameter;
use std::sync::Arc;

pub struct Weight<T: Numeric> {
    w: Vec<Parameter<T>>,
    b: Parameter<T>,
}

impl<T: Numeric> Weight<T> {
    pub fn new(n: usize, optimizer: &Arc<Optimizer<T>>) -> Self {
        Self::with_initializer(n, optimizer, &mut || T::zero())
    }

    pub fn with_initializer(
        n: usize,
        optimizer: &Arc<Optimizer<T>>,
        init: &mut dyn FnMut() -> T,
    ) -> Self {
        Self::with_initializer_and_regularization(n, optimizer, init, T::zero(), T::zero())
    }

    pub fn with_initializer_and_regularization(
        n: usize,
        optimizer: &Arc<Optimizer<T>>,
        init: &mut dyn FnMut() -> T,
        l1: T,
        l2: T,
    ) -> Self {
        let w = (0..n)
            .map(|_| Parameter::with_regularization(optimizer, init(), l1, l2))
            .collect();
        Weight {
            w,
            b: Parameter::with_regularization(optimizer, T::zero(), l1, l2),
        }
    }

    pub fn weight(&self, i: usize) -> T {
        self.w[i].value()
    }

    pub fn weights(&self) -> Data<T> {
        Data::from(self.w.iter().map(|p| p.value()).collect::<Vec<_>>())
    }

    pub fn bias(&self) -> T {
        self.b.value()
    }

    pub fn add_weight_grad(&self, i: usize, g: T) {
        self.w[i].add_grad(g);
    }

    pub fn add_bias_grad(&self, g: T) {
        self.b.add_grad(g);
    }

    pub fn update(&mut self) {
        for p in &mut self.w {
            p.update();
        }
        self.b.update();
    }

    /// `b + sum_{i in prev_active} w[i] * x[i]`.
    pub fn affine(&self, x: &Data<T>, prev_active: &[u32]) -> T {
        let mut result = self.bias();
        for &i in prev_active {
            let i = i as usize;
            result = result + self.weight(i) * x[i];
        }
        result
    }
}
