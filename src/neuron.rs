//! `Neuron`: one [`Weight`] plus forward/backward against a shared
//! [`Activation`].
use crate::activation::Activation;
use crate::data::{Data, Numeric};
use crate::optimizer::Optimizer;
use crate::weight::Weight;
use std::sync::Arc;

pub struct Neuron<T: Numeric> {
    weight: Weight<T>,
}

impl<T: Numeric> Neuron<T> {
    pub fn new(prev_units: usize, optimizer: &Arc<Optimizer<T>>) -> Self {
        Neuron {
            weight: Weight::new(prev_units, optimizer),
        }
    }

    pub fn with_initializer(
        prev_units: usize,
        optimizer: &Arc<Optimizer<T>>,
        init: &mut dyn FnMut() -> T,
    ) -> Self {
        Neuron {
            weight: Weight::with_initializer(prev_units, optimizer, init),
        }
    }

    pub fn with_initializer_and_regularization(
        prev_units: usize,
        optimizer: &Arc<Optimizer<T>>,
        init: &mut dyn FnMut() -> T,
        l1: T,
        l2: T,
    ) -> Self {
        Neuron {
            weight: Weight::with_initializer_and_regularization(
                prev_units, optimizer, init, l1, l2,
            ),
        }
    }

    /// `y = f(affine(X, prev_active))`.
    pub fn forward(&self, x: &Data<T>, prev_active: &[u32], f: Activation) -> T {
        f.call(self.weight.affine(x, prev_active))
    }

    /// Propagates `dL_dy` back through the activation and this neuron's
    /// weights, accumulating into `dL_dx` and the weight/bias gradients.
    pub fn backward(
        &self,
        x: &Data<T>,
        y: T,
        dl_dy: T,
        dl_dx: &mut Data<T>,
        prev_active: &[u32],
        f: Activation,
    ) {
        let dl_dy = f.back(y, dl_dy);
        for &i in prev_active {
            let i = i as usize;
            dl_dx[i] = dl_dx[i] + dl_dy * self.weight.weight(i);
            self.weight.add_weight_grad(i, dl_dy * x[i]);
        }
        self.weight.add_bias_grad(dl_dy);
    }

    pub fn w(&self) -> Data<T> {
        self.weight.weights()
    }

    pub fn update(&mut self) {
        self.weight.update();
    }
}
