//! Crate error type.
//!
//! Every failure here is a configuration or input mistake made by the caller;
//! nothing is transient, so there is nothing to retry.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Samples or labels that violate the data model (e.g. a label that is not one-hot).
    InvalidData(String),
    /// Model or training configuration that cannot be used (unknown activation, zero dims, bad lr).
    InvalidConfig(String),
    /// A sample, label or batch whose length does not match the model dimensions.
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
