//! Softmax output layer (multi-class logistic regression).

use crate::softmax::{argmax, one_hot, softmax_into};
use crate::{Error, Result};

/// Fully-connected hidden -> output layer followed by softmax.
///
/// Parameters start at zero: the hidden layer already breaks symmetry, and a
/// zero-initialized softmax layer starts from the uniform distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (out_dim, in_dim).
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl LogisticRegression {
    pub fn new(in_dim: usize, out_dim: usize) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidConfig(format!(
                "output layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }
        Ok(Self {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
            biases: vec![0.0; out_dim],
        })
    }

    /// Build a layer from explicit parameters; `weights` is row-major `(out_dim, in_dim)`.
    pub fn from_parts(
        in_dim: usize,
        out_dim: usize,
        weights: Vec<f64>,
        biases: Vec<f64>,
    ) -> Result<Self> {
        let mut layer = Self::new(in_dim, out_dim)?;
        if weights.len() != layer.weights.len() {
            return Err(Error::InvalidShape(format!(
                "weights length {} does not match out_dim * in_dim ({out_dim} * {in_dim})",
                weights.len()
            )));
        }
        if biases.len() != out_dim {
            return Err(Error::InvalidShape(format!(
                "biases length {} does not match out_dim {out_dim}",
                biases.len()
            )));
        }
        if weights.iter().chain(&biases).any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "output layer parameters must be finite".to_owned(),
            ));
        }
        layer.weights = weights;
        layer.biases = biases;
        Ok(layer)
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    /// Row-major `(out_dim, in_dim)` weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Class probabilities for one hidden vector, written into `out`.
    ///
    /// `logits` is scratch space for the pre-activations. Both buffers must have
    /// `out_dim` entries and `hidden.len() == in_dim`.
    #[inline]
    pub fn output_into(&self, hidden: &[f64], logits: &mut [f64], out: &mut [f64]) {
        assert_eq!(
            hidden.len(),
            self.in_dim,
            "hidden len {} does not match output in_dim {}",
            hidden.len(),
            self.in_dim
        );
        assert_eq!(logits.len(), self.out_dim, "logits len does not match out_dim");

        for (k, a) in logits.iter_mut().enumerate() {
            let row = &self.weights[k * self.in_dim..(k + 1) * self.in_dim];
            let mut sum = self.biases[k];
            for (&w, &z) in row.iter().zip(hidden) {
                sum = w.mul_add(z, sum);
            }
            *a = sum;
        }
        softmax_into(logits, out);
    }

    /// Class probabilities `softmax(V z + c)` for one hidden vector.
    pub fn output(&self, hidden: &[f64]) -> Vec<f64> {
        let mut logits = vec![0.0; self.out_dim];
        let mut probs = vec![0.0; self.out_dim];
        self.output_into(hidden, &mut logits, &mut probs);
        probs
    }

    /// Forward + backward over one mini-batch, followed by a batch-averaged SGD step.
    ///
    /// For each example the error is `delta_k = y_k - t_k`, the gradient of
    /// categorical cross-entropy with respect to the softmax logits. That shortcut
    /// only holds for softmax outputs paired with one-hot targets.
    ///
    /// Returns the per-example error rows so the caller can backpropagate them
    /// into the hidden layer.
    ///
    /// Shape contract: `hidden_batch` and `labels` have the same non-zero length,
    /// hidden rows have `in_dim` entries and labels `out_dim` entries.
    pub fn train<L: AsRef<[u8]>>(
        &mut self,
        hidden_batch: &[Vec<f64>],
        labels: &[L],
        lr: f64,
    ) -> Vec<Vec<f64>> {
        assert!(!hidden_batch.is_empty(), "train requires a non-empty batch");
        assert_eq!(
            hidden_batch.len(),
            labels.len(),
            "batch has {} hidden rows but {} labels",
            hidden_batch.len(),
            labels.len()
        );
        assert!(lr.is_finite() && lr > 0.0, "learning rate must be finite and > 0");

        let mut grad_w = vec![0.0; self.weights.len()];
        let mut grad_b = vec![0.0; self.out_dim];
        let mut logits = vec![0.0; self.out_dim];
        let mut errors = Vec::with_capacity(hidden_batch.len());

        for (hidden, label) in hidden_batch.iter().zip(labels) {
            let label = label.as_ref();
            assert_eq!(label.len(), self.out_dim, "label len does not match out_dim");

            let mut delta = vec![0.0; self.out_dim];
            self.output_into(hidden, &mut logits, &mut delta);
            for (d, &t) in delta.iter_mut().zip(label) {
                *d -= f64::from(t);
            }

            for (k, &d) in delta.iter().enumerate() {
                let row = &mut grad_w[k * self.in_dim..(k + 1) * self.in_dim];
                for (g, &z) in row.iter_mut().zip(hidden) {
                    *g = d.mul_add(z, *g);
                }
                grad_b[k] += d;
            }
            errors.push(delta);
        }

        let batch = hidden_batch.len() as f64;
        for (w, g) in self.weights.iter_mut().zip(&grad_w) {
            *w -= lr * g / batch;
        }
        for (b, g) in self.biases.iter_mut().zip(&grad_b) {
            *b -= lr * g / batch;
        }

        errors
    }

    /// One-hot decision: the class with the highest probability (first on ties).
    pub fn predict(&self, hidden: &[f64]) -> Vec<u8> {
        let probs = self.output(hidden);
        one_hot(argmax(&probs), self.out_dim)
    }
}
