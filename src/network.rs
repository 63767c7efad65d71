//! `Network`: an ordered stack of [`Layer`]s over a shared [`Optimizer`],
//! ticked by a [`Scheduler`] for LSH rehashing.
use crate::data::{BatchData, BatchView, Data, Numeric};
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::optimizer::Optimizer;
use crate::scheduler::Scheduler;
use crate::utils::index_vec;
use rayon::prelude::*;
use std::sync::Arc;

pub struct Network<T: Numeric> {
    layers: Vec<Layer<T>>,
    output_dim: usize,
    optimizer: Arc<Optimizer<T>>,
    scheduler: Scheduler,
}

impl<T: Numeric> Network<T> {
    pub(crate) fn new(
        layers: Vec<Layer<T>>,
        output_dim: usize,
        optimizer: Arc<Optimizer<T>>,
        scheduler: Scheduler,
    ) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        Ok(Network {
            layers,
            output_dim,
            optimizer,
            scheduler,
        })
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Forward pass over a batch. Does not mutate any parameter.
    #[cfg_attr(
        feature = "verbose-tracing",
        tracing::instrument(skip_all, fields(batch_size = x.batch_size()))
    )]
    pub fn forward(&mut self, x: BatchView<T>) -> Result<BatchData<T>> {
        let input_dim = self.layers[0].units();
        if x.data_size() != input_dim {
            return Err(Error::DimensionMismatch {
                expected: input_dim,
                found: x.data_size(),
            });
        }

        let batch_size = x.batch_size();
        for layer in &mut self.layers {
            layer.reset(batch_size);
        }

        let layers = &self.layers;
        let rows: Vec<Vec<T>> = index_vec(batch_size)
            .into_par_iter()
            .map(|i| -> Result<Vec<T>> {
                let i = i as usize;
                let input = Data::from(x.row(i));
                let mut prev_active = layers[0].active_id(i);
                let mut data = layers[0].forward(i, &input, &prev_active)?;
                for layer in &layers[1..] {
                    data = layer.forward(i, &data, &prev_active)?;
                    prev_active = layer.active_id(i);
                }
                Ok(data.as_slice().to_vec())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut out = BatchData::zeros(self.output_dim, batch_size);
        for (i, row) in rows.into_iter().enumerate() {
            out.row_mut(i).copy_from_slice(&row);
        }
        Ok(out)
    }

    /// Backward pass: accumulates gradients over the batch, applies the
    /// optimizer step, ticks the rehash scheduler, and updates every layer.
    #[cfg_attr(
        feature = "verbose-tracing",
        tracing::instrument(skip_all, fields(batch_size = dl_dy.batch_size()))
    )]
    pub fn backward(&mut self, dl_dy: BatchView<T>) -> Result<()> {
        if dl_dy.data_size() != self.output_dim {
            return Err(Error::DimensionMismatch {
                expected: self.output_dim,
                found: dl_dy.data_size(),
            });
        }

        let batch_size = dl_dy.batch_size();
        let n = self.layers.len();
        let layers = &self.layers;

        index_vec(batch_size)
            .into_par_iter()
            .try_for_each(|i| -> Result<()> {
                let i = i as usize;
                let mut grad = Data::from(dl_dy.row(i));
                for j in (1..n).rev() {
                    let prev_x = layers[j - 1].fx(i);
                    let prev_active = layers[j - 1].active_id(i);
                    if let Some(next) = layers[j].backward(i, &grad, &prev_x, &prev_active)? {
                        grad = next;
                    }
                }
                Ok(())
            })?;

        self.optimizer.step();
        let is_rehash = self.scheduler.tick();
        #[cfg(feature = "verbose-tracing")]
        if is_rehash {
            tracing::debug!("rehash scheduler fired, rebuilding dense-layer LSH indices");
        }
        self.layers
            .par_iter_mut()
            .try_for_each(|layer| layer.update(is_rehash))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::activation::Activation;
    use crate::builder::NetworkBuilder;
    use crate::hash::WtaFactory;
    use crate::initializer::Initializer;

    #[test]
    fn minimal_network_learns_a_sign_flip() {
        // A 1-1 linear network with constant-zero weights should output 0,
        // then flip to -1 after one SGD step on a target of +1.
        let mut net: Network<f32> = NetworkBuilder::new(1)
            .hidden_units(vec![1])
            .hash_tables(8)
            .hash_factory(std::sync::Arc::new(WtaFactory::new(8, 1)))
            .optimizer(Optimizer::sgd(1.0, 1.0))
            .rehash_schedule(Scheduler::constant_frequency(1).unwrap())
            .activation(Activation::Linear)
            .initializer(Initializer::constant(0.0))
            .sparsity(1.0)
            .seed(1)
            .build()
            .unwrap();

        let x_batch = vec![0.0f32];
        let view = BatchView::new(1, &x_batch).unwrap();
        let y0 = net.forward(view).unwrap();
        assert_eq!(y0.row(0), &[0.0]);

        let dy = vec![1.0f32];
        let dy_view = BatchView::new(1, &dy).unwrap();
        net.backward(dy_view).unwrap();

        let view = BatchView::new(1, &x_batch).unwrap();
        let y1 = net.forward(view).unwrap();
        assert_eq!(y1.row(0), &[-1.0]);
    }

    #[test]
    fn forward_rejects_input_row_of_wrong_size() {
        let mut net: Network<f32> = NetworkBuilder::new(2)
            .hash_tables(4)
            .hash_factory(std::sync::Arc::new(WtaFactory::new(4, 2)))
            .optimizer(Optimizer::sgd(1.0, 1.0))
            .build()
            .unwrap();
        let x = vec![0.0f32, 0.0, 0.0];
        let view = BatchView::new(3, &x).unwrap();
        let err = net.forward(view).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn backward_rejects_gradient_row_of_wrong_size() {
        let mut net: Network<f32> = NetworkBuilder::new(2)
            .hash_tables(4)
            .hash_factory(std::sync::Arc::new(WtaFactory::new(4, 2)))
            .optimizer(Optimizer::sgd(1.0, 1.0))
            .build()
            .unwrap();
        let x = vec![0.0f32, 0.0];
        net.forward(BatchView::new(2, &x).unwrap()).unwrap();

        let dy = vec![0.0f32, 0.0, 0.0];
        let err = net.backward(BatchView::new(3, &dy).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn forward_rejects_empty_network_at_construction() {
        let err = match Network::<f32>::new(Vec::new(), 1, Optimizer::sgd(1.0, 1.0), Scheduler::constant_frequency(1).unwrap()) {
            Err(e) => e,
            Ok(_) => panic!("expected Err(Error::EmptyNetwork)"),
        };
        assert!(matches!(err, Error::EmptyNetwork));
    }
}
