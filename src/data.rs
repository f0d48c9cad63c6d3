//! Contiguous labelled dataset.
//!
//! Samples and one-hot labels are stored row-major in two flat buffers:
//! - `inputs.len() == len * input_dim`
//! - `labels.len() == len * num_classes`
//!
//! Every label is checked to be one-hot on construction, so the training loop
//! can hand rows straight to [`crate::Mlp::train`].

use crate::softmax::class_index;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<f64>,
    labels: Vec<u8>,
    len: usize,
    input_dim: usize,
    num_classes: usize,
}

impl Dataset {
    /// Build a dataset from flat buffers with shapes `(len, input_dim)` and
    /// `(len, num_classes)`.
    pub fn from_flat(
        inputs: Vec<f64>,
        labels: Vec<u8>,
        input_dim: usize,
        num_classes: usize,
    ) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidData("input_dim must be > 0".to_owned()));
        }
        if num_classes == 0 {
            return Err(Error::InvalidData("num_classes must be > 0".to_owned()));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        if !inputs.len().is_multiple_of(input_dim) {
            return Err(Error::InvalidShape(format!(
                "inputs length {} is not divisible by input_dim {input_dim}",
                inputs.len()
            )));
        }

        let len = inputs.len() / input_dim;
        if labels.len() != len * num_classes {
            return Err(Error::InvalidShape(format!(
                "labels length {} does not match len * num_classes ({len} * {num_classes})",
                labels.len()
            )));
        }
        if inputs.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "inputs must contain only finite values".to_owned(),
            ));
        }
        for (i, label) in labels.chunks_exact(num_classes).enumerate() {
            if class_index(label).is_none() {
                return Err(Error::InvalidData(format!(
                    "label row {i} is not one-hot: {label:?}"
                )));
            }
        }

        Ok(Self {
            inputs,
            labels,
            len,
            input_dim,
            num_classes,
        })
    }

    /// Build a dataset from per-sample rows.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(inputs: &[Vec<f64>], labels: &[Vec<u8>]) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(Error::InvalidShape(format!(
                "inputs/labels length mismatch: {} vs {}",
                inputs.len(),
                labels.len()
            )));
        }
        let (Some(first_input), Some(first_label)) = (inputs.first(), labels.first()) else {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        };

        let input_dim = first_input.len();
        let num_classes = first_label.len();
        for (i, row) in inputs.iter().enumerate() {
            if row.len() != input_dim {
                return Err(Error::InvalidShape(format!(
                    "input row {i} has len {}, expected {input_dim}",
                    row.len()
                )));
            }
        }
        for (i, row) in labels.iter().enumerate() {
            if row.len() != num_classes {
                return Err(Error::InvalidShape(format!(
                    "label row {i} has len {}, expected {num_classes}",
                    row.len()
                )));
            }
        }

        Self::from_flat(inputs.concat(), labels.concat(), input_dim, num_classes)
    }

    #[inline]
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    /// Always false for a constructed dataset; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[inline]
    /// Returns the `idx`-th sample. Panics if `idx >= len`.
    pub fn input(&self, idx: usize) -> &[f64] {
        let start = idx * self.input_dim;
        &self.inputs[start..start + self.input_dim]
    }

    #[inline]
    /// Returns the `idx`-th one-hot label. Panics if `idx >= len`.
    pub fn label(&self, idx: usize) -> &[u8] {
        let start = idx * self.num_classes;
        &self.labels[start..start + self.num_classes]
    }

    /// Iterate over `(sample, label)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[u8])> + '_ {
        self.inputs
            .chunks_exact(self.input_dim)
            .zip(self.labels.chunks_exact(self.num_classes))
    }

    /// Gather the rows at `indices` into a mini-batch, reusing the given buffers.
    pub fn gather<'a>(
        &'a self,
        indices: &[usize],
        inputs: &mut Vec<&'a [f64]>,
        labels: &mut Vec<&'a [u8]>,
    ) {
        inputs.clear();
        labels.clear();
        for &idx in indices {
            inputs.push(self.input(idx));
            labels.push(self.label(idx));
        }
    }
}
