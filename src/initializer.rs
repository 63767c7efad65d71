//! Weight initializers: a nullary producer of `T`.
//!
//! `Constant(0)` is the default. `Gauss` is carried alongside it because a
//! from-scratch network where every weight starts identical never breaks
//! symmetry across neurons sharing a hash bucket.
use crate::data::Numeric;
use crate::utils::create_rng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;

pub enum Initializer<T> {
    Constant(T),
    Gauss { mu: T, sigma: T, seed: u64 },
}

impl<T: Numeric> Initializer<T> {
    pub fn constant(v: T) -> Self {
        Initializer::Constant(v)
    }

    pub fn gauss(mu: T, sigma: T, seed: u64) -> Self {
        Initializer::Gauss { mu, sigma, seed }
    }

    /// Builds a stateful sampler. A fresh `FnMut() -> T` is requested per
    /// `Weight` so a `Gauss` initializer's RNG advances independently for
    /// every neuron it initializes.
    pub fn sampler(&self) -> Box<dyn FnMut() -> T> {
        match self {
            Initializer::Constant(v) => {
                let v = *v;
                Box::new(move || v)
            }
            Initializer::Gauss { mu, sigma, seed } => {
                let mu = mu.to_f64().unwrap();
                let sigma = sigma.to_f64().unwrap();
                let dist = Normal::new(mu, sigma).expect("sigma must be finite and non-negative");
                let rng = RefCell::new(create_rng(*seed));
                Box::new(move || T::from_f64(dist.sample(&mut *rng.borrow_mut())).unwrap())
            }
        }
    }
}

impl<T: Numeric> Default for Initializer<T> {
    fn default() -> Self {
        Initializer::Constant(T::zero())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constant_always_returns_same_value() {
        let init: Initializer<f32> = Initializer::constant(0.5);
        let mut f = init.sampler();
        assert_eq!(f(), 0.5);
        assert_eq!(f(), 0.5);
    }

    #[test]
    fn default_is_constant_zero() {
        let init: Initializer<f32> = Initializer::default();
        let mut f = init.sampler();
        assert_eq!(f(), 0.0);
    }

    #[test]
    fn gauss_is_reproducible_for_a_fixed_seed() {
        let init_a: Initializer<f32> = Initializer::gauss(0.0, 1.0, 42);
        let init_b: Initializer<f32> = Initializer::gauss(0.0, 1.0, 42);
        let mut a = init_a.sampler();
        let mut b = init_b.sampler();
        let xs: Vec<f32> = (0..5).map(|_| a()).collect();
        let ys: Vec<f32> = (0..5).map(|_| b()).collect();
        assert_eq!(xs, ys);
    }
}
