//! Sub-linear deep learning: an LSH-sampled sparse feed-forward network
//! trained with accumulate-then-update parameters, following the SLIDE
//! algorithm (Spring et al., 2020).
//!
//! The public surface is a [`builder::NetworkBuilder`] that assembles a
//! [`network::Network`] out of [`layer::Layer`]s, each layer retrieving its
//! active neuron subset through an [`lsh::Lsh`] index rather than computing
//! every neuron's output.
extern crate ndarray;

pub mod activation;
mod atomic_float;
pub mod builder;
pub mod data;
pub mod error;
pub mod hash;
pub mod initializer;
pub mod layer;
pub mod lsh;
pub mod network;
pub mod neuron;
pub mod optimizer;
pub mod param;
pub mod scheduler;
pub mod utils;
pub mod weight;

pub use activation::Activation;
pub use atomic_float::GradAtomic;
pub use builder::NetworkBuilder;
pub use data::{BatchData, BatchView, Data, Numeric};
pub use error::{Error, Result};
pub use hash::{DwtaFactory, HashFactory, VecHash, WtaFactory};
pub use initializer::Initializer;
pub use network::Network;
pub use optimizer::{Optimizer, OptimizerClient};
pub use scheduler::Scheduler;
