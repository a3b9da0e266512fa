//! 4-class MLP classifier: `2 -> H (sigmoid) -> 4 (softmax)`.
//!
//! Trained with categorical cross-entropy. The output error is the closed-form
//! softmax + cross-entropy gradient `probs - onehot(label)`.

use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activation::{argmax, softmax_into};
use crate::classifier::Classifier;
use crate::error::validate_learning_rate;
use crate::grid::sample_points;
use crate::history::TrainingHistory;
use crate::loss::{cross_entropy, softmax_output_error};
use crate::metrics::{StepMetrics, Tally, WeightMagnitudes};
use crate::network::{MlpParameters, Scratch, TwoLayerNet};
use crate::{Bounds, Dataset, Point, Result, Sample};

/// Number of output classes.
pub const NUM_CLASSES: usize = 4;

/// Class probabilities, summing to 1.
pub type Probabilities = [f64; NUM_CLASSES];

/// One sampled point of the 4-class decision surface.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MulticlassGridPoint {
    pub x: f64,
    pub y: f64,
    /// Most probable class (lowest index on ties).
    pub class: usize,
    /// Probability of `class`.
    pub confidence: f64,
    pub predictions: Probabilities,
}

#[derive(Debug, Clone)]
pub struct MulticlassMlp {
    net: TwoLayerNet,
    learning_rate: f64,
    rng: StdRng,
    scratch: Scratch,
    history: TrainingHistory<MlpParameters>,
}

impl MulticlassMlp {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_HIDDEN_SIZE: usize = 8;

    /// Default learning rate and hidden size, seeded.
    pub fn with_defaults(seed: u64) -> Result<Self> {
        Self::new_with_seed(Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_HIDDEN_SIZE, seed)
    }

    pub fn new_with_seed(learning_rate: f64, hidden_size: usize, seed: u64) -> Result<Self> {
        Self::new_with_rng(learning_rate, hidden_size, StdRng::seed_from_u64(seed))
    }

    pub fn new_with_rng(learning_rate: f64, hidden_size: usize, mut rng: StdRng) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let net = TwoLayerNet::new_with_rng(hidden_size, NUM_CLASSES, &mut rng)?;
        Ok(Self::assemble(net, learning_rate, rng))
    }

    /// Start from explicit parameters (`weights2` must be `H x 4`); `reset`
    /// draws from `seed`.
    pub fn from_parameters(learning_rate: f64, params: &MlpParameters, seed: u64) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let net = TwoLayerNet::from_parameters(params, NUM_CLASSES)?;
        Ok(Self::assemble(net, learning_rate, StdRng::seed_from_u64(seed)))
    }

    fn assemble(net: TwoLayerNet, learning_rate: f64, rng: StdRng) -> Self {
        let history = TrainingHistory::new(net.parameters());
        Self {
            scratch: net.scratch(),
            net,
            learning_rate,
            rng,
            history,
        }
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn hidden_size(&self) -> usize {
        self.net.hidden_size()
    }

    fn probabilities_with(&self, x: Point, scratch: &mut Scratch) -> Probabilities {
        self.net.forward(&x, &mut scratch.hidden, &mut scratch.logits);
        let mut probs = [0.0; NUM_CLASSES];
        softmax_into(&scratch.logits, &mut probs);
        probs
    }
}

impl Classifier for MulticlassMlp {
    type Prediction = Probabilities;
    type Parameters = MlpParameters;
    type Boundary = Vec<MulticlassGridPoint>;

    const NUM_CLASSES: usize = NUM_CLASSES;

    fn predict(&self, x: Point) -> Probabilities {
        self.probabilities_with(x, &mut self.net.scratch())
    }

    fn predict_class(&self, x: Point) -> usize {
        argmax(&self.predict(x))
    }

    fn sample_loss(&self, sample: &Sample) -> f64 {
        cross_entropy(&self.predict(sample.features), sample.label)
    }

    fn score_each<F>(&self, data: &Dataset, mut f: F)
    where
        F: FnMut(&Sample, f64, usize),
    {
        let mut scratch = self.net.scratch();
        for sample in data {
            let probs = self.probabilities_with(sample.features, &mut scratch);
            f(sample, cross_entropy(&probs, sample.label), argmax(&probs));
        }
    }

    fn train_step(&mut self, data: &Dataset) -> Result<StepMetrics> {
        data.check_labels(NUM_CLASSES)?;

        let lr = self.learning_rate;
        let mut tally = Tally::default();
        let mut probs = [0.0; NUM_CLASSES];
        for sample in data {
            let x = sample.features;
            let s = &mut self.scratch;
            self.net.forward(&x, &mut s.hidden, &mut s.logits);
            softmax_into(&s.logits, &mut probs);

            let loss = softmax_output_error(&probs, sample.label, &mut s.d_logits);
            tally.add(loss, argmax(&probs) == sample.label);
            self.net.backprop_step(&x, s, lr);
        }

        let (loss, accuracy) = tally.finish();
        let net = &self.net;
        self.history
            .record_epoch(loss, accuracy, || net.parameters());
        tracing::debug!(
            model = "mlp-4class",
            epoch = self.history.epoch(),
            loss,
            accuracy,
            "epoch complete"
        );
        Ok(StepMetrics { loss, accuracy })
    }

    fn reset(&mut self) {
        self.net.randomize(&mut self.rng);
        self.history = TrainingHistory::new(self.net.parameters());
    }

    #[inline]
    fn history(&self) -> &TrainingHistory<MlpParameters> {
        &self.history
    }

    fn parameters(&self) -> MlpParameters {
        self.net.parameters()
    }

    fn weight_magnitudes(&self) -> WeightMagnitudes {
        self.net.weight_magnitudes()
    }

    fn decision_boundary(
        &self,
        bounds: Bounds,
        resolution: usize,
    ) -> Result<Vec<MulticlassGridPoint>> {
        let mut scratch = self.net.scratch();
        Ok(sample_points(bounds, resolution)?
            .into_iter()
            .map(|[x, y]| {
                let predictions = self.probabilities_with([x, y], &mut scratch);
                let class = argmax(&predictions);
                MulticlassGridPoint {
                    x,
                    y,
                    class,
                    confidence: predictions[class],
                    predictions,
                }
            })
            .collect())
    }
}
