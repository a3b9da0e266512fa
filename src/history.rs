//! Per-epoch training history.
//!
//! Invariants after any number of completed training steps:
//!
//! - `losses().len() == accuracies().len() == epoch()`
//! - `snapshots().len() == 1 + epoch() / SNAPSHOT_INTERVAL`

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parameter snapshot is taken every this many epochs (plus one at epoch 0).
pub const SNAPSHOT_INTERVAL: usize = 5;

/// Deep copy of a classifier's parameters at a given epoch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSnapshot<P> {
    pub epoch: usize,
    pub parameters: P,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingHistory<P> {
    epoch: usize,
    losses: Vec<f64>,
    accuracies: Vec<f64>,
    snapshots: Vec<WeightSnapshot<P>>,
}

impl<P> TrainingHistory<P> {
    /// Fresh history at epoch 0 holding the initial parameter snapshot.
    pub fn new(initial: P) -> Self {
        Self {
            epoch: 0,
            losses: Vec::new(),
            accuracies: Vec::new(),
            snapshots: vec![WeightSnapshot {
                epoch: 0,
                parameters: initial,
            }],
        }
    }

    /// Record one completed epoch.
    ///
    /// `snapshot` is only called when the new epoch lands on [`SNAPSHOT_INTERVAL`].
    pub fn record_epoch(&mut self, loss: f64, accuracy: f64, snapshot: impl FnOnce() -> P) {
        self.epoch += 1;
        self.losses.push(loss);
        self.accuracies.push(accuracy);
        if self.epoch % SNAPSHOT_INTERVAL == 0 {
            self.snapshots.push(WeightSnapshot {
                epoch: self.epoch,
                parameters: snapshot(),
            });
        }
    }

    #[inline]
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    #[inline]
    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    #[inline]
    pub fn accuracies(&self) -> &[f64] {
        &self.accuracies
    }

    #[inline]
    pub fn snapshots(&self) -> &[WeightSnapshot<P>] {
        &self.snapshots
    }

    /// Most recent epoch loss, or 0 before the first epoch.
    pub fn last_loss(&self) -> f64 {
        self.losses.last().copied().unwrap_or(0.0)
    }

    /// Most recent epoch accuracy, or 0 before the first epoch.
    pub fn last_accuracy(&self) -> f64 {
        self.accuracies.last().copied().unwrap_or(0.0)
    }
}
