//! `Parameter`: value + atomically accumulated gradient + owned optimizer
//! client.
use crate::atomic_float::GradAtomic;
use crate::data::Numeric;
use crate::optimizer::{Optimizer, OptimizerClient};
use std::cell::UnsafeCell;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// `value` mutates only inside [`Parameter::update`]; `grad` is written
/// concurrently from many threads via [`Parameter::add_grad`] and read-and-
/// cleared atomically inside `update`. L1/L2 regularization is folded into
/// the accumulator at deposit time, not at update time:
/// `g + sign(value)*L1 + L2*value`.
pub struct Parameter<T: Numeric> {
    // `update()` must be called exclusively (never concurrently with itself
    // or with another `update()` on the same parameter), so a plain
    // `UnsafeCell` read/write for `value` is safe under that discipline.
    value: UnsafeCell<T>,
    grad: <T as GradAtomic>::Storage,
    client: Box<dyn OptimizerClient<T>>,
    l1: T,
    l2: T,
}

// SAFETY: `value` is only ever mutated from within `update()`, which
// callers must invoke exclusively (never overlapping another `update()`
// nor a concurrent read of `value`). `grad` is a genuine atomic. The
// optimizer client is exclusive to this parameter.
unsafe impl<T: Numeric> Sync for Parameter<T> {}

impl<T: Numeric> Parameter<T> {
    pub fn new(optimizer: &Arc<Optimizer<T>>) -> Self {
        Self::with_value(optimizer, T::zero())
    }

    pub fn with_value(optimizer: &Arc<Optimizer<T>>, value: T) -> Self {
        Parameter {
            value: UnsafeCell::new(value),
            grad: T::new_storage(T::zero()),
            client: optimizer.client(),
            l1: T::zero(),
            l2: T::zero(),
        }
    }

    pub fn with_regularization(optimizer: &Arc<Optimizer<T>>, value: T, l1: T, l2: T) -> Self {
        Parameter {
            value: UnsafeCell::new(value),
            grad: T::new_storage(T::zero()),
            client: optimizer.client(),
            l1,
            l2,
        }
    }

    /// Current value. Safe to call concurrently with `add_grad` and with
    /// other readers; never concurrently with `update()`.
    pub fn value(&self) -> T {
        unsafe { *self.value.get() }
    }

    /// Atomically deposits `g`, plus L1/L2 regularization evaluated at the
    /// parameter's current value.
    pub fn add_grad(&self, g: T) {
        let v = self.value();
        let sign = if v > T::zero() {
            T::one()
        } else if v < T::zero() {
            -T::one()
        } else {
            T::zero()
        };
        let reg = sign * self.l1 + self.l2 * v;
        T::fetch_add(&self.grad, g + reg, Ordering::AcqRel);
    }

    /// Atomically swaps the gradient accumulator to zero and applies the
    /// optimizer client's update rule to `value`. Must not be called
    /// concurrently with itself, with another read of `value`, or with
    /// `add_grad` for the same step.
    pub fn update(&mut self) {
        let g = T::exchange_zero(&self.grad, Ordering::AcqRel);
        let diff = self.client.diff(g);
        unsafe {
            *self.value.get() = *self.value.get() + diff;
        }
    }
}
