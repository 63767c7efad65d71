//! `Layer`: Input / Dense / Output variants addressed by their position in
//! the owning [`crate::network::Network`]'s `Vec<Layer<T>>` rather than via
//! shared/weak pointers.
use crate::activation::Activation;
use crate::data::{Data, Numeric};
use crate::error::Result;
use crate::hash::HashFactory;
use crate::lsh::Lsh;
use crate::neuron::Neuron;
use crate::optimizer::Optimizer;
use crate::utils::index_vec;
use rayon::prelude::*;
use std::cell::UnsafeCell;
use std::sync::Arc;

pub enum Layer<T: Numeric> {
    Input {
        active: Vec<u32>,
        y: Vec<UnsafeCell<Data<T>>>,
    },
    Output {
        active: Vec<u32>,
        y: Vec<UnsafeCell<Data<T>>>,
    },
    Dense {
        neurons: Vec<Neuron<T>>,
        lsh: Lsh<T>,
        activation: Activation,
        y: Vec<UnsafeCell<Data<T>>>,
        active_idx: Vec<UnsafeCell<Vec<u32>>>,
    },
}

// SAFETY: `y`/`active_idx` are only ever touched at index `batch_i`, and
// callers (the Network's parallel-for over batch indices) only ever run one
// thread per `batch_i` between a `reset` and the matching `update` — the
// same per-slot exclusivity discipline `Parameter` relies on for `value`.
unsafe impl<T: Numeric> Sync for Layer<T> {}

impl<T: Numeric> Layer<T> {
    pub fn input(units: usize) -> Self {
        Layer::Input {
            active: index_vec(units),
            y: Vec::new(),
        }
    }

    pub fn output(units: usize) -> Self {
        Layer::Output {
            active: index_vec(units),
            y: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn dense(
        prev_units: usize,
        units: usize,
        activation: Activation,
        l: usize,
        hash_factory: Arc<dyn HashFactory<T>>,
        optimizer: &Arc<Optimizer<T>>,
        init: &mut dyn FnMut() -> T,
        l1: T,
        l2: T,
        sparsity: T,
        seed: u64,
    ) -> Result<Self> {
        let neurons: Vec<Neuron<T>> = (0..units)
            .map(|_| Neuron::with_initializer_and_regularization(prev_units, optimizer, init, l1, l2))
            .collect();
        let mut lsh = Lsh::new(l, prev_units, hash_factory, sparsity, seed)?;
        lsh.add(&neurons)?;
        Ok(Layer::Dense {
            neurons,
            lsh,
            activation,
            y: Vec::new(),
            active_idx: Vec::new(),
        })
    }

    pub fn units(&self) -> usize {
        match self {
            Layer::Input { active, .. } | Layer::Output { active, .. } => active.len(),
            Layer::Dense { neurons, .. } => neurons.len(),
        }
    }

    pub fn reset(&mut self, batch_size: usize) {
        let units = self.units();
        match self {
            Layer::Input { y, .. } | Layer::Output { y, .. } => {
                *y = (0..batch_size)
                    .map(|_| UnsafeCell::new(Data::zeros(units)))
                    .collect();
            }
            Layer::Dense { y, active_idx, .. } => {
                *y = (0..batch_size)
                    .map(|_| UnsafeCell::new(Data::zeros(units)))
                    .collect();
                *active_idx = (0..batch_size).map(|_| UnsafeCell::new(Vec::new())).collect();
            }
        }
    }

    pub fn fx(&self, batch_i: usize) -> Data<T> {
        let y = match self {
            Layer::Input { y, .. } | Layer::Output { y, .. } | Layer::Dense { y, .. } => y,
        };
        unsafe { (*y[batch_i].get()).clone() }
    }

    pub fn active_id(&self, batch_i: usize) -> Vec<u32> {
        match self {
            Layer::Input { active, .. } | Layer::Output { active, .. } => active.clone(),
            Layer::Dense { active_idx, .. } => unsafe { (*active_idx[batch_i].get()).clone() },
        }
    }

    /// Computes this layer's own forward transform; the caller (Network)
    /// threads the result and the layer's `active_id` into the next
    /// layer's call, since layers no longer hold direct links to each
    /// other.
    pub fn forward(&self, batch_i: usize, x: &Data<T>, prev_active: &[u32]) -> Result<Data<T>> {
        match self {
            Layer::Input { y, .. } | Layer::Output { y, .. } => {
                unsafe { *y[batch_i].get() = x.clone() };
                Ok(x.clone())
            }
            Layer::Dense {
                neurons,
                lsh,
                activation,
                y,
                active_idx,
            } => {
                let active = lsh.retrieve(x)?;
                let mut out = Data::zeros(neurons.len());
                for &n in &active {
                    out[n as usize] = neurons[n as usize].forward(x, prev_active, *activation);
                }
                unsafe {
                    *active_idx[batch_i].get() = active;
                    *y[batch_i].get() = out.clone();
                }
                Ok(out)
            }
        }
    }

    /// Computes the gradient to propagate to the previous layer; `None`
    /// only for the input layer, which is always the backward chain's
    /// terminal step.
    pub fn backward(
        &self,
        batch_i: usize,
        dl_dy: &Data<T>,
        prev_x: &Data<T>,
        prev_active: &[u32],
    ) -> Result<Option<Data<T>>> {
        match self {
            Layer::Input { .. } => Ok(None),
            Layer::Output { .. } => Ok(Some(dl_dy.clone())),
            Layer::Dense {
                neurons,
                activation,
                active_idx,
                ..
            } => {
                let active = unsafe { (*active_idx[batch_i].get()).clone() };
                let y = self.fx(batch_i);
                let mut dl_dx = Data::zeros(prev_x.len());
                for &n in &active {
                    let n = n as usize;
                    neurons[n].backward(
                        prev_x,
                        y[n],
                        dl_dy[n],
                        &mut dl_dx,
                        prev_active,
                        *activation,
                    );
                }
                Ok(Some(dl_dx))
            }
        }
    }

    /// Updates every owned parameter; `Dense` additionally rehashes its
    /// LSH index when `is_rehash` is set.
    pub fn update(&mut self, is_rehash: bool) -> Result<()> {
        if let Layer::Dense {
            neurons, lsh, ..
        } = self
        {
            neurons
                .par_iter_mut()
                .for_each(|n| n.update());
            if is_rehash {
                #[cfg(feature = "verbose-tracing")]
                tracing::trace!(neurons = neurons.len(), "rebuilding dense-layer LSH index");
                lsh.reset()?;
                lsh.add(neurons)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::WtaFactory;

    #[test]
    fn input_layer_forward_is_identity_and_active_id_is_full_range() {
        let mut l: Layer<f32> = Layer::input(3);
        l.reset(1);
        let x: Data<f32> = Data::from(vec![1.0, 2.0, 3.0]);
        let y = l.forward(0, &x, &[]).unwrap();
        assert_eq!(y, x);
        assert_eq!(l.active_id(0), vec![0, 1, 2]);
    }

    #[test]
    fn output_layer_backward_passes_gradient_through_unchanged() {
        let mut l: Layer<f32> = Layer::output(2);
        l.reset(1);
        let x: Data<f32> = Data::from(vec![1.0, 2.0]);
        l.forward(0, &x, &[0, 1]).unwrap();
        let dl_dy: Data<f32> = Data::from(vec![0.5, -0.5]);
        let out = l.backward(0, &dl_dy, &x, &[0, 1]).unwrap().unwrap();
        assert_eq!(out, dl_dy);
    }

    #[test]
    fn dense_layer_active_positions_hold_neuron_output_rest_stay_zero() {
        let opt = Optimizer::<f32>::sgd(1.0, 1.0);
        let mut zero = || 0.0f32;
        let mut l: Layer<f32> = Layer::dense(
            4,
            3,
            Activation::Linear,
            4,
            Arc::new(WtaFactory::new(2, 2)),
            &opt,
            &mut zero,
            0.0,
            0.0,
            1.0,
            7,
        )
        .unwrap();
        l.reset(1);
        let x: Data<f32> = Data::from(vec![1.0, 2.0, 3.0, 4.0]);
        let y = l.forward(0, &x, &[0, 1, 2, 3]).unwrap();
        // weights start at 0, bias starts at 0, so every active neuron's
        // linear output is 0 regardless of which neurons were retrieved.
        assert!(y.iter().all(|&v| v == 0.0));
    }
}
