//! Atomic fetch-add / exchange over floating point bit patterns.
//!
//! `T` is typically `f32`, which has no native atomic type in `std`. The
//! required primitive — atomic fetch-add and atomic exchange — is built as
//! a compare-and-swap loop over the bit representation, which is correct
//! here because gradient accumulation only needs commutativity modulo
//! floating point rounding, not a particular summation order.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// A floating point type with an atomic fetch-add / exchange primitive.
///
/// Implemented only for `f32` and `f64`, the two scalar types the crate
/// supports.
pub trait GradAtomic: Copy + PartialEq {
    type Storage: Send + Sync;

    fn new_storage(v: Self) -> Self::Storage;
    fn load(storage: &Self::Storage, order: Ordering) -> Self;
    fn fetch_add(storage: &Self::Storage, v: Self, order: Ordering) -> Self;
    /// Atomically reads the current value and resets it to zero.
    fn exchange_zero(storage: &Self::Storage, order: Ordering) -> Self;
}

impl GradAtomic for f32 {
    type Storage = AtomicU32;

    fn new_storage(v: Self) -> Self::Storage {
        AtomicU32::new(v.to_bits())
    }

    fn load(storage: &Self::Storage, order: Ordering) -> Self {
        f32::from_bits(storage.load(order))
    }

    fn fetch_add(storage: &Self::Storage, v: Self, order: Ordering) -> Self {
        let mut current = storage.load(order);
        loop {
            let new = f32::from_bits(current) + v;
            match storage.compare_exchange_weak(current, new.to_bits(), order, order) {
                Ok(prev_bits) => return f32::from_bits(prev_bits),
                Err(actual) => current = actual,
            }
        }
    }

    fn exchange_zero(storage: &Self::Storage, order: Ordering) -> Self {
        f32::from_bits(storage.swap(0.0f32.to_bits(), order))
    }
}

impl GradAtomic for f64 {
    type Storage = AtomicU64;

    fn new_storage(v: Self) -> Self::Storage {
        AtomicU64::new(v.to_bits())
    }

    fn load(storage: &Self::Storage, order: Ordering) -> Self {
        f64::from_bits(storage.load(order))
    }

    fn fetch_add(storage: &Self::Storage, v: Self, order: Ordering) -> Self {
        let mut current = storage.load(order);
        loop {
            let new = f64::from_bits(current) + v;
            match storage.compare_exchange_weak(current, new.to_bits(), order, order) {
                Ok(prev_bits) => return f64::from_bits(prev_bits),
                Err(actual) => current = actual,
            }
        }
    }

    fn exchange_zero(storage: &Self::Storage, order: Ordering) -> Self {
        f64::from_bits(storage.swap(0.0f64.to_bits(), order))
    }
}
