//! Activation functions for the hidden layer.
//!
//! The hidden layer computes a pre-activation `a = W x + b` and then applies the
//! activation element-wise: `z = activation(a)`.
//!
//! Only the post-activation outputs `z` are kept for backprop, so the derivative
//! is expressed in terms of the *output*: `differentiate(z)` returns `dz/da`.
//! For `Sigmoid` and `Tanh` that is the usual shortcut (`z (1 - z)` and `1 - z^2`);
//! passing the raw pre-activation instead gives wrong gradients.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Element-wise activation function of the hidden layer.
pub enum Activation {
    /// `1` for `x >= 0`, `-1` otherwise. Its derivative is zero, so a hidden layer
    /// using it never learns.
    Step,
    Sigmoid,
    Tanh,
    ReLU,
}

impl Activation {
    pub const ALL: [Activation; 4] = [
        Activation::Step,
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::ReLU,
    ];

    #[inline]
    pub fn compute(self, x: f64) -> f64 {
        match self {
            Activation::Step => {
                if x >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
            Activation::ReLU => x.max(0.0),
        }
    }

    /// Derivative of the activation with respect to its input, expressed in terms
    /// of the already-computed output `y = compute(x)`.
    #[inline]
    pub fn differentiate(self, y: f64) -> f64 {
        match self {
            Activation::Step => 0.0,
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Tanh => 1.0 - y * y,
            // Output and pre-activation share a sign, so either works here.
            Activation::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Factor applied to the `1 / sqrt(in_dim)` weight-init bound.
    ///
    /// Sigmoid is nearly linear over a narrow range around 0, so it gets a wider
    /// range (Glorot & Bengio); ReLU uses the He gain.
    #[inline]
    pub fn init_scale(self) -> f64 {
        match self {
            Activation::Step | Activation::Tanh => 1.0,
            Activation::Sigmoid => 4.0,
            Activation::ReLU => std::f64::consts::SQRT_2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Step => "Step",
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "Tanh",
            Activation::ReLU => "ReLU",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = Error;

    /// Parse an activation by name (`"Step"`, `"Sigmoid"`, `"Tanh"`, `"ReLU"`),
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        Activation::ALL
            .into_iter()
            .find(|act| act.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "unknown activation `{s}`; expected one of Step, Sigmoid, Tanh, ReLU"
                ))
            })
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    // Numerically stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matches_finite_difference(act: Activation) {
        let eps = 1e-5;
        let mut x = -4.0;
        while x <= 4.0 {
            let numeric = (act.compute(x + eps) - act.compute(x - eps)) / (2.0 * eps);
            let analytic = act.differentiate(act.compute(x));
            assert!(
                (analytic - numeric).abs() < 1e-6,
                "{act} at x={x}: analytic={analytic} numeric={numeric}"
            );
            x += 0.25;
        }
    }

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        assert_matches_finite_difference(Activation::Sigmoid);
    }

    #[test]
    fn tanh_derivative_matches_finite_difference() {
        assert_matches_finite_difference(Activation::Tanh);
    }

    #[test]
    fn step_is_signed_and_flat() {
        assert_eq!(Activation::Step.compute(0.0), 1.0);
        assert_eq!(Activation::Step.compute(2.5), 1.0);
        assert_eq!(Activation::Step.compute(-0.1), -1.0);
        assert_eq!(Activation::Step.differentiate(1.0), 0.0);
        assert_eq!(Activation::Step.differentiate(-1.0), 0.0);
    }

    #[test]
    fn relu_values_and_gradient() {
        assert_eq!(Activation::ReLU.compute(-2.0), 0.0);
        assert_eq!(Activation::ReLU.compute(3.0), 3.0);
        assert_eq!(Activation::ReLU.differentiate(0.0), 0.0);
        assert_eq!(Activation::ReLU.differentiate(3.0), 1.0);
        assert_eq!(Activation::ReLU.differentiate(-3.0), 0.0);
    }

    #[test]
    fn sigmoid_is_stable_for_extreme_inputs() {
        assert!((Activation::Sigmoid.compute(0.0) - 0.5).abs() < 1e-12);
        assert_eq!(Activation::Sigmoid.compute(800.0), 1.0);
        assert_eq!(Activation::Sigmoid.compute(-800.0), 0.0);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Tanh".parse::<Activation>().unwrap(), Activation::Tanh);
        assert_eq!("relu".parse::<Activation>().unwrap(), Activation::ReLU);
        assert_eq!(" SIGMOID ".parse::<Activation>().unwrap(), Activation::Sigmoid);
        for act in Activation::ALL {
            assert_eq!(act.to_string().parse::<Activation>().unwrap(), act);
        }
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = "Softplus".parse::<Activation>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("Softplus"));
    }
}
