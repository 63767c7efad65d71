//! Optimizer / OptimizerClient two-object split.
//!
//! The shared [`Optimizer`] holds hyperparameters and phase counters (e.g.
//! Adam's `beta1^t`); every [`Parameter`](crate::param::Parameter) owns a
//! `Client` carrying its own per-parameter state (Adam's `m`, `v`). The
//! client holds a read-only `Arc` handle back to the optimizer for its
//! hyperparameters and phase counters.
use crate::atomic_float::GradAtomic;
use crate::data::Numeric;
use std::cell::Cell;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Per-parameter optimizer state plus a read-only handle to the shared
/// hyperparameters/phase counters.
pub trait OptimizerClient<T>: Send + Sync {
    /// Computes the value delta to add for an accumulated gradient.
    fn diff(&mut self, grad: T) -> T;
}

enum Inner<T: Numeric> {
    Sgd {
        eta: Cell<T>,
        decay: T,
    },
    Adam {
        eta: T,
        beta1: T,
        beta2: T,
        eps: T,
        // Phase counters: beta1^t / beta2^t, advanced once per `step()`.
        // Parameter updates only ever read these concurrently with other
        // reads (all updates happen after `step()` returns, never during),
        // so plain atomics suffice — no CAS races with a writer are
        // possible within a training step.
        beta1t: <T as GradAtomic>::Storage,
        beta2t: <T as GradAtomic>::Storage,
    },
}

// `Cell<T>` inside `Sgd` is only ever touched from `step()`, called once
// between the parallel backward and parallel layer-update phases — never
// concurrently with itself or with a client's `diff()` (clients only read
// `eta` during the layer-update phase, strictly after `step()` returns).
unsafe impl<T: Numeric> Sync for Inner<T> {}

/// Shared optimizer: hyperparameters plus any phase counters that evolve
/// across training steps (`SGD`'s decaying learning rate, `Adam`'s
/// bias-correction terms).
pub struct Optimizer<T: Numeric> {
    inner: Inner<T>,
}

impl<T: Numeric> Optimizer<T> {
    pub fn sgd(lr: T, decay: T) -> Arc<Self> {
        Arc::new(Optimizer {
            inner: Inner::Sgd {
                eta: Cell::new(lr),
                decay,
            },
        })
    }

    pub fn adam(lr: T, beta1: T, beta2: T, eps: T) -> Arc<Self> {
        Arc::new(Optimizer {
            inner: Inner::Adam {
                eta: lr,
                beta1,
                beta2,
                eps,
                beta1t: T::new_storage(beta1),
                beta2t: T::new_storage(beta2),
            },
        })
    }

    pub fn adam_default(lr: T) -> Arc<Self> {
        let half = T::from_f64(0.9).unwrap();
        let near_one = T::from_f64(0.999).unwrap();
        let eps = T::from_f64(1e-8).unwrap();
        Self::adam(lr, half, near_one, eps)
    }

    /// Builds a fresh per-parameter client bound to this optimizer.
    pub fn client(self: &Arc<Self>) -> Box<dyn OptimizerClient<T>> {
        match &self.inner {
            Inner::Sgd { .. } => Box::new(SgdClient {
                optimizer: Arc::clone(self),
            }),
            Inner::Adam { .. } => Box::new(AdamClient {
                optimizer: Arc::clone(self),
                m: T::zero(),
                v: T::zero(),
            }),
        }
    }

    /// Advances the optimizer's phase counters. Called exactly once per
    /// training step").
    pub fn step(&self) {
        match &self.inner {
            Inner::Sgd { eta, decay } => eta.set(eta.get() * *decay),
            Inner::Adam {
                beta1,
                beta2,
                beta1t,
                beta2t,
                ..
            } => {
                let prev1 = T::load(beta1t, Ordering::Acquire);
                T::fetch_add(beta1t, prev1 * *beta1 - prev1, Ordering::AcqRel);
                let prev2 = T::load(beta2t, Ordering::Acquire);
                T::fetch_add(beta2t, prev2 * *beta2 - prev2, Ordering::AcqRel);
            }
        }
    }
}

struct SgdClient<T: Numeric> {
    optimizer: Arc<Optimizer<T>>,
}

impl<T: Numeric> OptimizerClient<T> for SgdClient<T> {
    fn diff(&mut self, grad: T) -> T {
        let Inner::Sgd { eta, .. } = &self.optimizer.inner else {
            unreachable!("SgdClient always pairs with an Optimizer::sgd");
        };
        -eta.get() * grad
    }
}

struct AdamClient<T: Numeric> {
    optimizer: Arc<Optimizer<T>>,
    m: T,
    v: T,
}

impl<T: Numeric> OptimizerClient<T> for AdamClient<T> {
    fn diff(&mut self, grad: T) -> T {
        let Inner::Adam {
            eta,
            beta1,
            beta2,
            eps,
            beta1t,
            beta2t,
        } = &self.optimizer.inner
        else {
            unreachable!("AdamClient always pairs with an Optimizer::adam");
        };

        self.m = *beta1 * self.m + (T::one() - *beta1) * grad;
        self.v = *beta2 * self.v + (T::one() - *beta2) * grad * grad;

        let beta1t = T::load(beta1t, Ordering::Acquire);
        let beta2t = T::load(beta2t, Ordering::Acquire);
        let m_hat = self.m / (T::one() - beta1t);
        let v_hat = self.v / (T::one() - beta2t);

        -*eta * m_hat / (v_hat.sqrt() + *eps)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sgd_diff_is_minus_lr_times_grad() {
        let opt = Optimizer::<f32>::sgd(0.1, 1.0);
        let mut client = opt.client();
        assert_eq!(client.diff(2.0), -0.2);
    }

    #[test]
    fn sgd_decay_shrinks_learning_rate_after_step() {
        let opt = Optimizer::<f32>::sgd(1.0, 0.5);
        let mut client = opt.client();
        assert_eq!(client.diff(1.0), -1.0);
        opt.step();
        assert_eq!(client.diff(1.0), -0.5);
    }

    #[test]
    fn adam_first_step_matches_closed_form() {
        let opt = Optimizer::<f32>::adam(0.1, 0.9, 0.999, 1e-8);
        let mut client = opt.client();
        let grad = 1.0f32;
        // m = 0.1*1 = 0.1, v = 0.001*1 = 0.001
        // m_hat = 0.1 / (1 - 0.9) = 1.0, v_hat = 0.001 / (1 - 0.999) = 1.0
        // diff = -0.1 * 1.0 / (sqrt(1.0) + 1e-8) ~= -0.1
        let diff = client.diff(grad);
        assert!((diff - (-0.1)).abs() < 1e-4);
    }
}
