//! Errors returned by classifier construction, training and evaluation.
//!
//! Every check runs before state is mutated, so an `Err` leaves the model as it was.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A dataset or parameter set the classifier cannot train on: empty,
    /// non-finite, or carrying a label outside the variant's classes.
    InvalidData(String),
    /// A hyperparameter, experiment setting or sampling request out of range.
    InvalidConfig(String),
    /// Feature rows or weight matrices that do not fit the `2 -> H -> K` layout.
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidData(msg) => write!(f, "unusable training data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "bad classifier setting: {msg}"),
            Error::InvalidShape(msg) => write!(f, "layout mismatch: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Shared learning-rate check used by every classifier constructor.
pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be finite and > 0, got {learning_rate}"
        )));
    }
    Ok(())
}
