//! Epoch-level training driver.
//!
//! `Mlp::fit` is the "batteries included" loop around [`Mlp::train`]: it splits a
//! [`Dataset`] into mini-batches, optionally reshuffles every epoch, and records
//! the mean cross-entropy after each epoch.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Dataset, Error, Mlp, Result, loss};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Sample order used to form mini-batches.
pub enum Shuffle {
    /// Keep dataset order every epoch.
    #[default]
    None,
    /// Reshuffle every epoch using a dedicated `StdRng` seeded with this value.
    Seeded(u64),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    pub epochs: usize,
    pub lr: f64,
    /// Samples per SGD step. The last batch of an epoch may be smaller.
    pub batch_size: usize,
    pub shuffle: Shuffle,
    /// Log progress every this many epochs (`None` disables progress logs).
    pub log_every: Option<usize>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 5_000,
            lr: 0.1,
            batch_size: 1,
            shuffle: Shuffle::None,
            log_every: Some(500),
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lr must be finite and > 0, got {}",
                self.lr
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if self.log_every == Some(0) {
            return Err(Error::InvalidConfig("log_every must be > 0".to_owned()));
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean cross-entropy over the training set after this epoch's updates.
    pub loss: f64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub epochs: Vec<EpochReport>,
    pub final_loss: f64,
}

impl Mlp {
    /// Train on `train` for `cfg.epochs` epochs of mini-batch SGD.
    pub fn fit(&mut self, train: &Dataset, cfg: &FitConfig) -> Result<FitReport> {
        cfg.validate()?;
        self.check_dataset(train)?;

        let mut order: Vec<usize> = (0..train.len()).collect();
        let mut rng = match cfg.shuffle {
            Shuffle::None => None,
            Shuffle::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };

        let mut batch_inputs = Vec::with_capacity(cfg.batch_size);
        let mut batch_labels = Vec::with_capacity(cfg.batch_size);
        let mut epochs = Vec::with_capacity(cfg.epochs);

        for epoch in 1..=cfg.epochs {
            if let Some(rng) = rng.as_mut() {
                order.shuffle(rng);
            }

            for indices in order.chunks(cfg.batch_size) {
                train.gather(indices, &mut batch_inputs, &mut batch_labels);
                self.train(&batch_inputs, &batch_labels, cfg.lr)?;
            }

            let loss = self.loss(train)?;
            epochs.push(EpochReport { epoch, loss });

            if cfg.log_every.is_some_and(|every| epoch % every == 0) {
                log::info!("epoch {epoch} out of {}: loss={loss:.6}", cfg.epochs);
            }
        }

        let final_loss = epochs.last().map_or(f64::NAN, |e| e.loss);
        log::info!(
            "trained {} epochs (batch_size={}, lr={}): final loss {final_loss:.6}",
            cfg.epochs,
            cfg.batch_size,
            cfg.lr
        );

        Ok(FitReport { epochs, final_loss })
    }

    /// Mean cross-entropy of the model's predictions over `data`.
    pub fn loss(&self, data: &Dataset) -> Result<f64> {
        self.check_dataset(data)?;

        let mut total = 0.0_f64;
        for (input, label) in data.iter() {
            total += loss::cross_entropy(&self.probabilities(input)?, label);
        }
        Ok(total / data.len() as f64)
    }

    pub(crate) fn check_dataset(&self, data: &Dataset) -> Result<()> {
        if data.input_dim() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "dataset input_dim {} does not match model input_dim {}",
                data.input_dim(),
                self.input_dim()
            )));
        }
        if data.num_classes() != self.output_dim() {
            return Err(Error::InvalidShape(format!(
                "dataset num_classes {} does not match model output_dim {}",
                data.num_classes(),
                self.output_dim()
            )));
        }
        Ok(())
    }
}
