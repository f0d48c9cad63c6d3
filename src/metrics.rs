//! Classification metrics.
//!
//! Metrics are evaluation helpers; they never participate in backprop.
//!
//! Precision and recall are undefined for a class that was never predicted
//! (zero column) or never present (zero row). Those cases return `None`
//! instead of dividing by zero.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::softmax::class_index;
use crate::{Dataset, Error, Mlp, Result};

/// `num_classes x num_classes` counts indexed `[actual][predicted]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    num_classes: usize,
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            return Err(Error::InvalidConfig("num_classes must be > 0".to_owned()));
        }
        Ok(Self {
            num_classes,
            counts: vec![0; num_classes * num_classes],
        })
    }

    /// Build from parallel slices of one-hot predictions and one-hot labels.
    pub fn from_one_hot<P, L>(predictions: &[P], labels: &[L]) -> Result<Self>
    where
        P: AsRef<[u8]>,
        L: AsRef<[u8]>,
    {
        if predictions.len() != labels.len() {
            return Err(Error::InvalidShape(format!(
                "{} predictions but {} labels",
                predictions.len(),
                labels.len()
            )));
        }
        let Some(first) = labels.first() else {
            return Err(Error::InvalidData(
                "need at least one labelled prediction".to_owned(),
            ));
        };

        let mut matrix = Self::new(first.as_ref().len())?;
        for (i, (pred, label)) in predictions.iter().zip(labels).enumerate() {
            let (pred, label) = (pred.as_ref(), label.as_ref());
            if pred.len() != matrix.num_classes || label.len() != matrix.num_classes {
                return Err(Error::InvalidShape(format!(
                    "row {i}: prediction len {} / label len {} do not match {} classes",
                    pred.len(),
                    label.len(),
                    matrix.num_classes
                )));
            }
            let predicted = class_index(pred).ok_or_else(|| {
                Error::InvalidData(format!("prediction {i} is not one-hot: {pred:?}"))
            })?;
            let actual = class_index(label).ok_or_else(|| {
                Error::InvalidData(format!("label {i} is not one-hot: {label:?}"))
            })?;
            matrix.record(actual, predicted);
        }
        Ok(matrix)
    }

    #[inline]
    fn index(&self, actual: usize, predicted: usize) -> usize {
        assert!(
            actual < self.num_classes && predicted < self.num_classes,
            "class index out of range: actual={actual} predicted={predicted} num_classes={}",
            self.num_classes
        );
        actual * self.num_classes + predicted
    }

    /// Count one sample. Panics if either class index is out of range.
    #[inline]
    pub fn record(&mut self, actual: usize, predicted: usize) {
        let idx = self.index(actual, predicted);
        self.counts[idx] += 1;
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Panics if either class index is out of range.
    #[inline]
    pub fn count(&self, actual: usize, predicted: usize) -> u64 {
        self.counts[self.index(actual, predicted)]
    }

    /// Rows of the matrix (one per actual class).
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.counts.chunks_exact(self.num_classes)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn correct(&self) -> u64 {
        (0..self.num_classes).map(|c| self.count(c, c)).sum()
    }

    fn column_sum(&self, class: usize) -> u64 {
        (0..self.num_classes).map(|a| self.count(a, class)).sum()
    }

    fn row_sum(&self, class: usize) -> u64 {
        (0..self.num_classes).map(|p| self.count(class, p)).sum()
    }

    /// Trace over total, or `None` for an empty matrix.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct(), self.total())
    }

    /// Of the samples predicted as `class`, the fraction that really are.
    pub fn precision(&self, class: usize) -> Option<f64> {
        ratio(self.count(class, class), self.column_sum(class))
    }

    /// Of the samples that really are `class`, the fraction predicted as such.
    pub fn recall(&self, class: usize) -> Option<f64> {
        ratio(self.count(class, class), self.row_sum(class))
    }
}

#[inline]
fn ratio(num: u64, den: u64) -> Option<f64> {
    (den != 0).then(|| num as f64 / den as f64)
}

/// Summary of a model evaluated on a labelled dataset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    /// Per class; `None` when the class was never predicted.
    pub precision: Vec<Option<f64>>,
    /// Per class; `None` when the class never occurs in the data.
    pub recall: Vec<Option<f64>>,
}

impl Evaluation {
    pub fn from_confusion(confusion: ConfusionMatrix) -> Result<Self> {
        let accuracy = confusion.accuracy().ok_or_else(|| {
            Error::InvalidData("cannot evaluate an empty confusion matrix".to_owned())
        })?;
        let classes = 0..confusion.num_classes();
        let precision = classes.clone().map(|c| confusion.precision(c)).collect();
        let recall = classes.map(|c| confusion.recall(c)).collect();
        Ok(Self {
            confusion,
            accuracy,
            precision,
            recall,
        })
    }
}

struct Percent(Option<f64>);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1} %", v * 100.0),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------------------")?;
        writeln!(f, "MLP model evaluation")?;
        writeln!(f, "--------------------")?;
        writeln!(f, "Accuracy:  {}", Percent(Some(self.accuracy)))?;
        writeln!(f, "Precision:")?;
        for (i, p) in self.precision.iter().enumerate() {
            writeln!(f, "class {}: {}", i + 1, Percent(*p))?;
        }
        writeln!(f, "Recall:")?;
        for (i, r) in self.recall.iter().enumerate() {
            writeln!(f, "class {}: {}", i + 1, Percent(*r))?;
        }
        Ok(())
    }
}

impl Mlp {
    /// Predict every sample of `data` and summarize against its labels.
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation> {
        self.check_dataset(data)?;

        let mut confusion = ConfusionMatrix::new(self.output_dim())?;
        for (input, label) in data.iter() {
            let predicted = class_index(&self.predict(input)?)
                .ok_or_else(|| Error::InvalidData("prediction is not one-hot".to_owned()))?;
            let actual = class_index(label)
                .ok_or_else(|| Error::InvalidData("label is not one-hot".to_owned()))?;
            confusion.record(actual, predicted);
        }
        Evaluation::from_confusion(confusion)
    }
}
