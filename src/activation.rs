//! Scalar activation functions: `y = f(x)`, `dx = f'(y) * dy`.
//!
//! Closed enum over a small variant set, dispatched with a `match` on the
//! variant rather than a trait object per neuron, since the set never
//! grows at runtime.
use crate::data::Numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    ReLU,
    Sigmoid,
}

impl Activation {
    /// `y = f(x)`.
    pub fn call<T: Numeric>(&self, x: T) -> T {
        match self {
            Activation::Linear => x,
            Activation::ReLU => {
                if x > T::zero() {
                    x
                } else {
                    T::zero()
                }
            }
            Activation::Sigmoid => T::one() / (T::one() + (-x).exp()),
        }
    }

    /// `dx = f'(y) * dy`, expressed in terms of the forward output `y`
    /// (not the pre-activation `x`) so no extra state needs to be kept
    /// around for the backward pass.
    pub fn back<T: Numeric>(&self, y: T, dy: T) -> T {
        match self {
            Activation::Linear => dy,
            Activation::ReLU => {
                if y > T::zero() {
                    dy
                } else {
                    T::zero()
                }
            }
            Activation::Sigmoid => y * (T::one() - y) * dy,
        }
    }
}

impl Default for Activation {
    fn default() -> Self {
        Activation::ReLU
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn linear_is_identity() {
        assert_eq!(Activation::Linear.call(2.0_f32), 2.0);
        assert_eq!(Activation::Linear.back(0.3_f32, 5.0), 5.0);
    }

    #[test]
    fn relu_gates_on_output_sign() {
        assert_eq!(Activation::ReLU.call(-1.0_f32), 0.0);
        assert_eq!(Activation::ReLU.call(2.0_f32), 2.0);
        assert_eq!(Activation::ReLU.back(2.0_f32, 3.0), 3.0);
        assert_eq!(Activation::ReLU.back(0.0_f32, 3.0), 0.0);
        assert_eq!(Activation::ReLU.back(-1.0_f32, 3.0), 0.0);
    }

    #[test]
    fn sigmoid_back_uses_output_not_input() {
        let y = Activation::Sigmoid.call(0.0_f32);
        assert_eq!(y, 0.5);
        let dy = Activation::Sigmoid.back(y, 1.0);
        assert_eq!(dy, 0.25);
    }
}
