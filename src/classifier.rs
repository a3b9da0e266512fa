//! The capability shared by every classifier variant.
//!
//! Drivers and tests are written against [`Classifier`] so they work with the
//! linear model, the binary MLP and the 4-class MLP alike. Variant-specific
//! shapes (probability vs. probability vector, line vs. sampled grid) surface
//! through associated types.

use crate::history::TrainingHistory;
use crate::metrics::{ClassReport, EvalReport, Metrics, StepMetrics, Tally, WeightMagnitudes};
use crate::{Bounds, Dataset, Error, Point, Result, Sample};

pub trait Classifier {
    /// Output of [`Classifier::predict`]: `f64` for binary variants, a
    /// probability vector for the 4-class variant.
    type Prediction;
    /// Owned deep copy of the trainable parameters.
    type Parameters: Clone;
    /// Output of [`Classifier::decision_boundary`].
    type Boundary;

    /// Number of classes labels must be drawn from.
    const NUM_CLASSES: usize;

    /// Forward pass. Pure given the current parameters.
    fn predict(&self, x: Point) -> Self::Prediction;

    fn predict_class(&self, x: Point) -> usize;

    /// Loss of a single sample under the current parameters.
    fn sample_loss(&self, sample: &Sample) -> f64;

    /// Calls `f(sample, loss, predicted_class)` for every sample of `data` in
    /// order, reusing one set of forward buffers for the whole pass.
    fn score_each<F>(&self, data: &Dataset, f: F)
    where
        F: FnMut(&Sample, f64, usize);

    /// One pass over `data`, updating the parameters after every sample.
    ///
    /// Increments the epoch counter by exactly one and appends the epoch's mean
    /// loss and accuracy to the history. Labels outside `0..NUM_CLASSES` are
    /// rejected before any parameter changes.
    fn train_step(&mut self, data: &Dataset) -> Result<StepMetrics>;

    /// Re-randomize parameters and clear all history.
    fn reset(&mut self);

    fn history(&self) -> &TrainingHistory<Self::Parameters>;

    /// Deep copy of the current parameters.
    fn parameters(&self) -> Self::Parameters;

    fn weight_magnitudes(&self) -> WeightMagnitudes;

    /// Decision surface over `bounds`.
    ///
    /// Grid-based variants sample `resolution` steps per axis; the linear model
    /// returns its exact boundary line and ignores `resolution`.
    fn decision_boundary(&self, bounds: Bounds, resolution: usize) -> Result<Self::Boundary>;

    /// Run `epochs` training steps, returning the metrics of the last one.
    fn train(&mut self, data: &Dataset, epochs: usize) -> Result<StepMetrics> {
        self.train_with(data, epochs, |_, _| {})
    }

    /// Like [`Classifier::train`], calling `on_epoch` with each epoch's metrics
    /// and its 1-based index within this call.
    fn train_with<F>(&mut self, data: &Dataset, epochs: usize, mut on_epoch: F) -> Result<StepMetrics>
    where
        F: FnMut(&StepMetrics, usize),
    {
        if epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        let mut last = None;
        for i in 1..=epochs {
            let m = self.train_step(data)?;
            on_epoch(&m, i);
            last = Some(m);
        }
        last.ok_or_else(|| Error::InvalidConfig("epochs must be > 0".to_owned()))
    }

    /// Latest loss/accuracy, epoch, parameter copy and snapshot history.
    fn metrics(&self) -> Metrics<Self::Parameters> {
        let history = self.history();
        Metrics {
            epoch: history.epoch(),
            loss: history.last_loss(),
            accuracy: history.last_accuracy(),
            parameters: self.parameters(),
            snapshots: history.snapshots().to_vec(),
        }
    }

    /// Mean loss and accuracy on `data` without training.
    fn evaluate(&self, data: &Dataset) -> Result<EvalReport> {
        data.check_labels(Self::NUM_CLASSES)?;
        let mut tally = Tally::default();
        self.score_each(data, |sample, loss, class| {
            tally.add(loss, class == sample.label);
        });
        let (loss, accuracy) = tally.finish();
        Ok(EvalReport { loss, accuracy })
    }

    /// [`Classifier::evaluate`] for each class present in `data`, in ascending
    /// class order.
    fn evaluate_per_class(&self, data: &Dataset) -> Result<Vec<ClassReport>> {
        data.check_labels(Self::NUM_CLASSES)?;
        let mut tallies = vec![Tally::default(); Self::NUM_CLASSES];
        self.score_each(data, |sample, loss, class| {
            tallies[sample.label].add(loss, class == sample.label);
        });
        Ok(tallies
            .into_iter()
            .enumerate()
            .filter(|(_, tally)| tally.seen() > 0)
            .map(|(class, tally)| {
                let samples = tally.seen();
                let (loss, accuracy) = tally.finish();
                ClassReport {
                    class,
                    samples,
                    report: EvalReport { loss, accuracy },
                }
            })
            .collect())
    }
}
