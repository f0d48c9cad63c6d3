//! Model builder.
//!
//! `MlpBuilder` is the recommended way to define a model. It makes the
//! structure explicit (input dim, hidden layer + activation, number of classes)
//! and validates every piece as it is added:
//!
//! ```rust
//! use mlp_classifier::{Activation, MlpBuilder};
//!
//! # fn main() -> mlp_classifier::Result<()> {
//! let mlp = MlpBuilder::new(2)?
//!     .hidden_layer(3, "Tanh".parse::<Activation>()?)?
//!     .output_layer(2)?
//!     .build_with_seed(1234)?;
//! assert_eq!(mlp.hidden_dim(), 3);
//! # Ok(())
//! # }
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Activation, Error, Mlp, Result, UpstreamWeights};

#[derive(Debug, Clone)]
pub struct MlpBuilder {
    input_dim: usize,
    hidden: Option<(usize, Activation)>,
    output_dim: Option<usize>,
    upstream: UpstreamWeights,
}

impl MlpBuilder {
    /// Start building a model that accepts samples of length `input_dim`.
    pub fn new(input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidConfig("input_dim must be > 0".to_owned()));
        }
        Ok(Self {
            input_dim,
            hidden: None,
            output_dim: None,
            upstream: UpstreamWeights::default(),
        })
    }

    /// Set the hidden layer width and its activation.
    pub fn hidden_layer(mut self, dim: usize, activation: Activation) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("hidden dim must be > 0".to_owned()));
        }
        self.hidden = Some((dim, activation));
        Ok(self)
    }

    /// Same as [`MlpBuilder::hidden_layer`], selecting the activation by name.
    pub fn hidden_layer_named(self, dim: usize, activation: &str) -> Result<Self> {
        self.hidden_layer(dim, activation.parse()?)
    }

    /// Set the number of output classes.
    pub fn output_layer(mut self, num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            return Err(Error::InvalidConfig(
                "number of classes must be > 0".to_owned(),
            ));
        }
        self.output_dim = Some(num_classes);
        Ok(self)
    }

    pub fn upstream_weights(mut self, upstream: UpstreamWeights) -> Self {
        self.upstream = upstream;
        self
    }

    /// Build using a deterministic seed.
    pub fn build_with_seed(self, seed: u64) -> Result<Mlp> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build using the provided RNG.
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Mlp> {
        let (hidden_dim, activation) = self.hidden.ok_or_else(|| {
            Error::InvalidConfig("mlp must have a hidden layer".to_owned())
        })?;
        let output_dim = self.output_dim.ok_or_else(|| {
            Error::InvalidConfig("mlp must have an output layer".to_owned())
        })?;

        let mlp = Mlp::new_with_rng(self.input_dim, hidden_dim, output_dim, activation, rng)?;
        Ok(mlp.with_upstream_weights(self.upstream))
    }
}
