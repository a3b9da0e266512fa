//! Metrics.
//!
//! Training steps and evaluations both reduce a dataset pass to a mean loss and
//! an accuracy in `[0, 1]`. [`Tally`] accumulates them sample by sample without
//! allocating.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::history::WeightSnapshot;

/// Result of one training epoch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub loss: f64,
    pub accuracy: f64,
}

/// Loss/accuracy of a model on a dataset, measured without training.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
    pub loss: f64,
    pub accuracy: f64,
}

/// Evaluation restricted to the samples of one class.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassReport {
    pub class: usize,
    pub samples: usize,
    pub report: EvalReport,
}

/// L2 norms of the input-to-hidden and hidden-to-output weights.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightMagnitudes {
    pub hidden: f64,
    pub output: f64,
}

/// Point-in-time view of a classifier: latest metrics, a copy of its
/// parameters and the snapshot history.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics<P> {
    pub epoch: usize,
    /// Latest epoch loss, 0 before the first epoch.
    pub loss: f64,
    /// Latest epoch accuracy, 0 before the first epoch.
    pub accuracy: f64,
    pub parameters: P,
    pub snapshots: Vec<WeightSnapshot<P>>,
}

/// Running loss sum and correct count over one dataset pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    total_loss: f64,
    correct: usize,
    seen: usize,
}

impl Tally {
    #[inline]
    pub(crate) fn add(&mut self, loss: f64, correct: bool) {
        self.total_loss += loss;
        self.seen += 1;
        if correct {
            self.correct += 1;
        }
    }

    #[inline]
    pub(crate) fn seen(&self) -> usize {
        self.seen
    }

    /// `(mean loss, accuracy)`. Callers guarantee at least one sample.
    #[inline]
    pub(crate) fn finish(self) -> (f64, f64) {
        let n = self.seen as f64;
        (self.total_loss / n, self.correct as f64 / n)
    }
}
