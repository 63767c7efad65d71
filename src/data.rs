//! Scalar, vector and batch container types shared across the crate.
use crate::atomic_float::GradAtomic;
use crate::error::{Error, Result};
use ndarray::{Array1, ScalarOperand};
use num_traits::{Float, FromPrimitive, NumCast, ToPrimitive};
use std::fmt::Debug;
use std::iter::Sum;

/// Bound satisfied by the crate's scalar type `T`.
///
/// Implemented for `f32` and `f64` only, since those are the only types
/// with an atomic gradient accumulator (see [`GradAtomic`]).
pub trait Numeric:
    Float
    + ScalarOperand
    + NumCast
    + FromPrimitive
    + ToPrimitive
    + Sum
    + GradAtomic
    + Debug
    + Send
    + Sync
    + 'static
{
}

impl Numeric for f32 {}
impl Numeric for f64 {}

/// A fixed-length, owned vector of scalars.
///
/// Thin wrapper around [`ndarray::Array1`]; exists as a named type so the
/// rest of the crate speaks in its own vocabulary (`Data<T>`) rather than
/// `ndarray`'s.
#[derive(Debug, Clone, PartialEq)]
pub struct Data<T> {
    values: Array1<T>,
}

impl<T: Numeric> Data<T> {
    pub fn zeros(size: usize) -> Self {
        Data {
            values: Array1::zeros(size),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.values
            .as_slice()
            .expect("Data is always contiguous by construction")
    }

    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.values
            .as_slice_mut()
            .expect("Data is always contiguous by construction")
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<T: Numeric> std::ops::Index<usize> for Data<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        &self.values[i]
    }
}

impl<T: Numeric> std::ops::IndexMut<usize> for Data<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.values[i]
    }
}

impl<T: Numeric> From<Vec<T>> for Data<T> {
    fn from(v: Vec<T>) -> Self {
        Data {
            values: Array1::from_vec(v),
        }
    }
}

impl<T: Numeric> From<&[T]> for Data<T> {
    fn from(v: &[T]) -> Self {
        Data {
            values: Array1::from_vec(v.to_vec()),
        }
    }
}

/// An owned, row-major `data_size * batch_size` buffer (row = sample).
#[derive(Debug, Clone)]
pub struct BatchData<T> {
    data_size: usize,
    data: Vec<T>,
}

impl<T: Numeric> BatchData<T> {
    /// Allocates a zero-filled batch of `batch_size` rows of `data_size` each.
    pub fn zeros(data_size: usize, batch_size: usize) -> Self {
        BatchData {
            data_size,
            data: vec![T::zero(); data_size * batch_size],
        }
    }

    pub fn from_rows(data_size: usize, data: Vec<T>) -> Result<Self> {
        if data.len() % data_size != 0 {
            return Err(Error::DimensionMismatch {
                expected: data_size,
                found: data.len() % data_size,
            });
        }
        Ok(BatchData { data_size, data })
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub fn batch_size(&self) -> usize {
        if self.data_size == 0 {
            0
        } else {
            self.data.len() / self.data_size
        }
    }

    pub fn row(&self, i: usize) -> &[T] {
        let off = i * self.data_size;
        &self.data[off..off + self.data_size]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let off = i * self.data_size;
        &mut self.data[off..off + self.data_size]
    }

    pub fn set_row(&mut self, i: usize, row: &Data<T>) {
        self.row_mut(i).copy_from_slice(row.as_slice());
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// A non-owning, row-major `data_size * batch_size` view.
#[derive(Debug, Clone, Copy)]
pub struct BatchView<'a, T> {
    data_size: usize,
    data: &'a [T],
}

impl<'a, T: Numeric> BatchView<'a, T> {
    pub fn new(data_size: usize, data: &'a [T]) -> Result<Self> {
        if data_size == 0 || data.len() % data_size != 0 {
            return Err(Error::DimensionMismatch {
                expected: data_size,
                found: data.len(),
            });
        }
        Ok(BatchView { data_size, data })
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub fn batch_size(&self) -> usize {
        self.data.len() / self.data_size
    }

    pub fn row(&self, i: usize) -> &'a [T] {
        let off = i * self.data_size;
        &self.data[off..off + self.data_size]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_indexing() {
        let d: Data<f32> = Data::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(d.len(), 3);
        assert_eq!(d[1], 2.0);
    }

    #[test]
    fn batch_data_rows() {
        let mut b: BatchData<f32> = BatchData::zeros(2, 3);
        assert_eq!(b.batch_size(), 3);
        b.row_mut(1).copy_from_slice(&[1.0, 2.0]);
        assert_eq!(b.row(1), &[1.0, 2.0]);
        assert_eq!(b.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn batch_data_from_rows_rejects_non_multiple() {
        let err = BatchData::from_rows(3, vec![1.0f32, 2.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn batch_view_rows() {
        let raw = [1.0f32, 2.0, 3.0, 4.0];
        let v = BatchView::new(2, &raw).unwrap();
        assert_eq!(v.batch_size(), 2);
        assert_eq!(v.row(0), &[1.0, 2.0]);
        assert_eq!(v.row(1), &[3.0, 4.0]);
    }
}
