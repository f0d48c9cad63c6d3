//! A two-layer perceptron classifier.
//!
//! `mlp-classifier` is a from-scratch feed-forward network with exactly one hidden
//! layer and a softmax output layer, trained by mini-batch SGD with backpropagation.
//!
//! # Architecture
//!
//! - [`HiddenLayer`]: `z = activation(W x + b)` with a selectable [`Activation`]
//!   (`Step`, `Sigmoid`, `Tanh`, `ReLU`). Weights start uniform in a bounded
//!   range drawn from a caller-supplied RNG; biases start at zero.
//! - [`LogisticRegression`]: `y = softmax(V z + c)`, zero-initialized. Its
//!   `train` step uses the softmax/cross-entropy shortcut `delta = y - t` and
//!   returns the per-example errors.
//! - [`Mlp`]: forward hidden -> forward/backward output -> backward hidden, one
//!   mini-batch at a time.
//!
//! All updates are batch-averaged (`lr * mean(gradient)`), so the effective step
//! size does not depend on the batch size.
//!
//! # Panics vs `Result`
//!
//! - Layer-level methods ([`HiddenLayer::backward`], [`LogisticRegression::train`], ...)
//!   treat shape mismatches as programmer error and panic via `assert!`.
//! - Model-level APIs ([`Mlp::train`], [`Mlp::predict`], [`Mlp::fit`],
//!   [`Mlp::evaluate`], [`Dataset`] constructors) validate their inputs and return
//!   [`Result`]. A rejected batch never touches the parameters.
//!
//! # Data layout
//!
//! - Scalars are `f64`; labels and predictions are one-hot `u8` vectors.
//! - Layer weights are row-major with shape `(out_dim, in_dim)`.
//!
//! # Quick start
//!
//! ```rust
//! use mlp_classifier::{Activation, Dataset, FitConfig, MlpBuilder};
//!
//! # fn main() -> mlp_classifier::Result<()> {
//! let xs = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//! ];
//! let ys = vec![vec![0, 1], vec![1, 0], vec![1, 0], vec![0, 1]];
//! let train = Dataset::from_rows(&xs, &ys)?;
//!
//! let mut mlp = MlpBuilder::new(2)?
//!     .hidden_layer(3, Activation::Tanh)?
//!     .output_layer(2)?
//!     .build_with_seed(1234)?;
//!
//! let report = mlp.fit(&train, &FitConfig { epochs: 2_000, log_every: None, ..FitConfig::default() })?;
//! assert!(report.final_loss < 0.1);
//! assert_eq!(mlp.predict(&[0.0, 1.0])?, vec![1, 0]);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving training yourself
//!
//! [`Mlp::train`] performs exactly one mini-batch step; the batch size is the
//! number of rows passed in.
//!
//! ```rust
//! use mlp_classifier::{Activation, Mlp};
//!
//! # fn main() -> mlp_classifier::Result<()> {
//! let mut mlp = Mlp::new_with_seed(3, 8, 2, Activation::ReLU, 0)?;
//! let inputs = [[0.1, -0.2, 0.3], [0.5, 0.5, -1.0]];
//! let labels = [[1u8, 0], [0, 1]];
//! for _ in 0..100 {
//!     mlp.train(&inputs, &labels, 0.05)?;
//! }
//! let probs = mlp.probabilities(&inputs[0])?;
//! assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod data;
pub mod error;
pub mod hidden;
pub mod logistic;
pub mod loss;
pub mod metrics;
pub mod mlp;
pub mod softmax;
pub mod train;

pub use activation::Activation;
pub use builder::MlpBuilder;
pub use data::Dataset;
pub use error::{Error, Result};
pub use hidden::HiddenLayer;
pub use logistic::LogisticRegression;
pub use metrics::{ConfusionMatrix, Evaluation};
pub use mlp::{Mlp, UpstreamWeights};
pub use train::{EpochReport, FitConfig, FitReport, Shuffle};
