use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::softmax::class_index;
use crate::{Activation, Error, HiddenLayer, LogisticRegression, Result};

/// Which output-layer weights the hidden layer backpropagates through.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpstreamWeights {
    /// Update the output layer first, then backpropagate through its new weights.
    /// This is the classic textbook ordering and the default.
    #[default]
    PostUpdate,
    /// Backpropagate through the weights that produced the forward pass
    /// (exact gradient of the batch loss). Costs one copy of the output weights
    /// per step.
    PreUpdate,
}

/// Two-layer perceptron: a hidden layer feeding a softmax output layer.
///
/// The model has a single lifecycle state: once constructed it can be trained
/// and queried until dropped. `train` takes `&mut self`, so training steps
/// can never overlap with each other or with `predict` on the same instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    hidden: HiddenLayer,
    output: LogisticRegression,
    upstream: UpstreamWeights,
}

impl Mlp {
    pub fn new_with_seed(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        activation: Activation,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(input_dim, hidden_dim, output_dim, activation, &mut rng)
    }

    /// Build a model, drawing the hidden-layer weights from `rng`.
    ///
    /// The RNG is only borrowed for construction, so building twice from
    /// identically seeded sources yields identical models.
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        let hidden = HiddenLayer::new_with_rng(input_dim, hidden_dim, activation, rng)?;
        let output = LogisticRegression::new(hidden_dim, output_dim)?;
        Self::from_layers(hidden, output)
    }

    /// Assemble a model from two layers whose dimensions line up.
    pub fn from_layers(hidden: HiddenLayer, output: LogisticRegression) -> Result<Self> {
        if hidden.out_dim() != output.in_dim() {
            return Err(Error::InvalidConfig(format!(
                "hidden out_dim {} does not match output in_dim {}",
                hidden.out_dim(),
                output.in_dim()
            )));
        }

        log::debug!(
            "built mlp {}-{}-{} with {} hidden activation",
            hidden.in_dim(),
            hidden.out_dim(),
            output.out_dim(),
            hidden.activation()
        );

        Ok(Self {
            hidden,
            output,
            upstream: UpstreamWeights::default(),
        })
    }

    pub fn with_upstream_weights(mut self, upstream: UpstreamWeights) -> Self {
        self.upstream = upstream;
        self
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.hidden.in_dim()
    }

    #[inline]
    pub fn hidden_dim(&self) -> usize {
        self.hidden.out_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.output.out_dim()
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.hidden.activation()
    }

    #[inline]
    pub fn upstream_weights(&self) -> UpstreamWeights {
        self.upstream
    }

    #[inline]
    pub fn hidden_layer(&self) -> &HiddenLayer {
        &self.hidden
    }

    #[inline]
    pub fn output_layer(&self) -> &LogisticRegression {
        &self.output
    }

    /// One mini-batch SGD step.
    ///
    /// 1. forward every input through the hidden layer
    /// 2. forward + backward + update the output layer, collecting `y - t`
    /// 3. backpropagate those errors into the hidden layer and update it
    ///
    /// The batch size is `inputs.len()`. The whole batch is validated before any
    /// parameter changes, so an error leaves the model untouched.
    pub fn train<X, L>(&mut self, inputs: &[X], labels: &[L], lr: f64) -> Result<()>
    where
        X: AsRef<[f64]>,
        L: AsRef<[u8]>,
    {
        self.check_batch(inputs, labels, lr)?;

        let hidden_outputs: Vec<Vec<f64>> = inputs
            .iter()
            .map(|x| self.hidden.forward(x.as_ref()))
            .collect();

        match self.upstream {
            UpstreamWeights::PostUpdate => {
                let errors = self.output.train(&hidden_outputs, labels, lr);
                self.hidden.backward(
                    inputs,
                    &hidden_outputs,
                    &errors,
                    self.output.weights(),
                    lr,
                );
            }
            UpstreamWeights::PreUpdate => {
                let snapshot = self.output.weights().to_vec();
                let errors = self.output.train(&hidden_outputs, labels, lr);
                self.hidden
                    .backward(inputs, &hidden_outputs, &errors, &snapshot, lr);
            }
        }

        Ok(())
    }

    /// Class probabilities for one sample.
    pub fn probabilities(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(0, input)?;
        let hidden = self.hidden.output(input);
        Ok(self.output.output(&hidden))
    }

    /// One-hot class prediction for one sample.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<u8>> {
        self.check_input(0, input)?;
        let hidden = self.hidden.output(input);
        Ok(self.output.predict(&hidden))
    }

    fn check_batch<X, L>(&self, inputs: &[X], labels: &[L], lr: f64) -> Result<()>
    where
        X: AsRef<[f64]>,
        L: AsRef<[u8]>,
    {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {lr}"
            )));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidShape("batch must not be empty".to_owned()));
        }
        if inputs.len() != labels.len() {
            return Err(Error::InvalidShape(format!(
                "batch has {} inputs but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        for (idx, (input, label)) in inputs.iter().zip(labels).enumerate() {
            self.check_input(idx, input.as_ref())?;
            self.check_label(idx, label.as_ref())?;
        }
        Ok(())
    }

    fn check_input(&self, idx: usize, input: &[f64]) -> Result<()> {
        if input.len() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "sample {idx} has len {}, model input_dim is {}",
                input.len(),
                self.input_dim()
            )));
        }
        if input.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(format!(
                "sample {idx} contains a non-finite value"
            )));
        }
        Ok(())
    }

    fn check_label(&self, idx: usize, label: &[u8]) -> Result<()> {
        if label.len() != self.output_dim() {
            return Err(Error::InvalidShape(format!(
                "label {idx} has len {}, model output_dim is {}",
                label.len(),
                self.output_dim()
            )));
        }
        if class_index(label).is_none() {
            return Err(Error::InvalidData(format!(
                "label {idx} is not one-hot: {label:?}"
            )));
        }
        Ok(())
    }
}
