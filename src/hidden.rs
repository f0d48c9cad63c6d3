use rand::Rng;

use crate::{Activation, Error, Result};

/// Fully-connected input -> hidden layer.
///
/// Owns its parameters; the only code that mutates them is [`HiddenLayer::backward`].
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenLayer {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (out_dim, in_dim).
    weights: Vec<f64>,
    biases: Vec<f64>,
    activation: Activation,
}

impl HiddenLayer {
    /// Create a layer with weights drawn from `U(-bound, bound)` and zero biases,
    /// where `bound = activation.init_scale() / sqrt(in_dim)`.
    ///
    /// Weights must not all start equal, otherwise every hidden unit receives the
    /// same gradient and they never diverge.
    pub fn new_with_rng<R: Rng + ?Sized>(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidConfig(format!(
                "hidden layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }

        let bound = activation.init_scale() / (in_dim as f64).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.gen_range(-bound..bound))
            .collect();

        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases: vec![0.0; out_dim],
            activation,
        })
    }

    /// Build a layer from explicit parameters.
    ///
    /// `weights` is row-major `(out_dim, in_dim)`.
    pub fn from_parts(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        weights: Vec<f64>,
        biases: Vec<f64>,
    ) -> Result<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(Error::InvalidConfig(format!(
                "hidden layer dims must be > 0, got in_dim={in_dim} out_dim={out_dim}"
            )));
        }
        if weights.len() != in_dim * out_dim {
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
                "hidden layer parameters must be finite".to_owned(),
            ));
        }

        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases,
            activation,
        })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Forward pass for a single sample, writing into `out`.
    ///
    /// Computes `a_j = sum_i w_ji * x_i + b_j` and `out[j] = activation(a_j)`.
    ///
    /// Shape contract:
    /// - `input.len() == self.in_dim`
    /// - `out.len() == self.out_dim`
    #[inline]
    pub fn output_into(&self, input: &[f64], out: &mut [f64]) {
        assert_eq!(
            input.len(),
            self.in_dim,
            "input len {} does not match hidden in_dim {}",
            input.len(),
            self.in_dim
        );
        assert_eq!(
            out.len(),
            self.out_dim,
            "out len {} does not match hidden out_dim {}",
            out.len(),
            self.out_dim
        );

        for (j, o) in out.iter_mut().enumerate() {
            let row = &self.weights[j * self.in_dim..(j + 1) * self.in_dim];
            let mut sum = self.biases[j];
            for (&w, &x) in row.iter().zip(input) {
                sum = w.mul_add(x, sum);
            }
            *o = self.activation.compute(sum);
        }
    }

    /// Hidden activations for `input`. Does not mutate the layer.
    pub fn output(&self, input: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.out_dim];
        self.output_into(input, &mut out);
        out
    }

    /// Training-time forward pass. Identical to [`HiddenLayer::output`]; the caller
    /// keeps the returned activations and hands them back to `backward`.
    #[inline]
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.output(input)
    }

    /// Backpropagate the output layer's error through `output_weights` and apply
    /// one batch-averaged SGD step to this layer.
    ///
    /// For every example and hidden unit `j`:
    /// - `e_j = (sum_k delta_k * v_kj) * activation'(z_j)`
    /// - `w_ji -= lr * mean(e_j * x_i)`, `b_j -= lr * mean(e_j)`
    ///
    /// Inputs:
    /// - `inputs`: the batch passed to `forward`
    /// - `hidden_outputs`: what `forward` returned for each row of `inputs`
    /// - `output_errors`: per-example `delta = y - t` from the output layer
    /// - `output_weights`: the output layer's row-major `(n_classes, out_dim)` matrix
    ///
    /// Shape contract:
    /// - `inputs`, `hidden_outputs` and `output_errors` have the same non-zero length
    /// - every input row has `in_dim` entries, every hidden row `out_dim`
    /// - every error row has `n_classes` entries and
    ///   `output_weights.len() == n_classes * out_dim`
    pub fn backward<X: AsRef<[f64]>>(
        &mut self,
        inputs: &[X],
        hidden_outputs: &[Vec<f64>],
        output_errors: &[Vec<f64>],
        output_weights: &[f64],
        lr: f64,
    ) {
        assert!(!inputs.is_empty(), "backward requires a non-empty batch");
        assert_eq!(
            inputs.len(),
            hidden_outputs.len(),
            "batch has {} inputs but {} hidden outputs",
            inputs.len(),
            hidden_outputs.len()
        );
        assert_eq!(
            inputs.len(),
            output_errors.len(),
            "batch has {} inputs but {} error rows",
            inputs.len(),
            output_errors.len()
        );
        assert!(lr.is_finite() && lr > 0.0, "learning rate must be finite and > 0");

        let n_classes = output_errors[0].len();
        assert_eq!(
            output_weights.len(),
            n_classes * self.out_dim,
            "output weights len {} does not match n_classes * hidden out_dim ({n_classes} * {})",
            output_weights.len(),
            self.out_dim
        );

        let mut grad_w = vec![0.0; self.weights.len()];
        let mut grad_b = vec![0.0; self.out_dim];

        for ((input, z), delta) in inputs.iter().zip(hidden_outputs).zip(output_errors) {
            let input = input.as_ref();
            assert_eq!(input.len(), self.in_dim, "input row len does not match in_dim");
            assert_eq!(z.len(), self.out_dim, "hidden row len does not match out_dim");
            assert_eq!(delta.len(), n_classes, "error rows must share one length");

            for j in 0..self.out_dim {
                let mut upstream = 0.0_f64;
                for (k, &d) in delta.iter().enumerate() {
                    upstream = d.mul_add(output_weights[k * self.out_dim + j], upstream);
                }
                let e = upstream * self.activation.differentiate(z[j]);

                let row = &mut grad_w[j * self.in_dim..(j + 1) * self.in_dim];
                for (g, &x) in row.iter_mut().zip(input) {
                    *g = e.mul_add(x, *g);
                }
                grad_b[j] += e;
            }
        }

        let batch = inputs.len() as f64;
        for (w, g) in self.weights.iter_mut().zip(&grad_w) {
            *w -= lr * g / batch;
        }
        for (b, g) in self.biases.iter_mut().zip(&grad_b) {
            *b -= lr * g / batch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn init_respects_bound_and_zero_biases() {
        let mut rng = StdRng::seed_from_u64(7);
        for act in Activation::ALL {
            let layer = HiddenLayer::new_with_rng(4, 5, act, &mut rng).unwrap();
            let bound = act.init_scale() / 2.0;
            assert_eq!(layer.weights().len(), 20);
            assert!(layer.weights().iter().all(|w| (-bound..bound).contains(w)));
            assert!(layer.biases().iter().all(|&b| b == 0.0));
            // Symmetry must be broken.
            assert!(layer.weights().windows(2).any(|w| w[0] != w[1]));
        }
    }

    #[test]
    fn rejects_zero_dims() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(HiddenLayer::new_with_rng(0, 3, Activation::Tanh, &mut rng).is_err());
        assert!(HiddenLayer::new_with_rng(2, 0, Activation::Tanh, &mut rng).is_err());
    }

    #[test]
    fn output_applies_affine_map_then_activation() {
        let layer = HiddenLayer::from_parts(
            2,
            2,
            Activation::ReLU,
            vec![1.0, -1.0, 0.5, 2.0],
            vec![0.25, -3.0],
        )
        .unwrap();

        let out = layer.output(&[2.0, 1.0]);
        // a_0 = 2 - 1 + 0.25, a_1 = 1 + 2 - 3
        assert_eq!(out, vec![1.25, 0.0]);
        assert_eq!(layer.forward(&[2.0, 1.0]), out);
    }

    #[test]
    fn backward_applies_batch_mean_update() {
        let mut layer =
            HiddenLayer::from_parts(2, 1, Activation::Tanh, vec![0.0, 0.0], vec![0.0]).unwrap();
        let inputs = [[1.0, 0.0], [0.0, 1.0]];
        // tanh(0) = 0, so activation' = 1 and e = delta . v.
        let hidden = vec![vec![0.0], vec![0.0]];
        let errors = vec![vec![0.5, -0.5], vec![1.0, 0.0]];
        let output_weights = [2.0, 1.0];

        layer.backward(&inputs, &hidden, &errors, &output_weights, 0.1);

        // e = [0.5 * 2 - 0.5 * 1, 1.0 * 2] = [0.5, 2.0]
        let w = layer.weights();
        assert!((w[0] - (-0.1 * 0.5 / 2.0)).abs() < 1e-12);
        assert!((w[1] - (-0.1 * 2.0 / 2.0)).abs() < 1e-12);
        assert!((layer.biases()[0] - (-0.1 * 2.5 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn step_activation_never_moves() {
        let mut layer =
            HiddenLayer::from_parts(1, 1, Activation::Step, vec![0.3], vec![0.1]).unwrap();
        let z = layer.forward(&[1.0]);
        layer.backward(&[[1.0]], &[z], &[vec![0.7]], &[1.0], 0.5);
        assert_eq!(layer.weights(), &[0.3]);
        assert_eq!(layer.biases(), &[0.1]);
    }

    #[test]
    #[should_panic]
    fn output_panics_on_input_shape_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let layer = HiddenLayer::new_with_rng(2, 3, Activation::Tanh, &mut rng).unwrap();
        layer.output(&[0.0; 3]);
    }
}
