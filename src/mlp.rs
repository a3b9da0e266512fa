//! Binary MLP classifier: `2 -> H (sigmoid) -> 1 (sigmoid)`.

use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activation::{sigmoid, threshold};
use crate::classifier::Classifier;
use crate::error::validate_learning_rate;
use crate::grid::sample_points;
use crate::history::TrainingHistory;
use crate::loss::{binary_cross_entropy, binary_output_error};
use crate::metrics::{StepMetrics, Tally, WeightMagnitudes};
use crate::network::{MlpParameters, Scratch, TwoLayerNet};
use crate::{Bounds, Dataset, Point, Result, Sample};

/// One sampled point of the binary decision surface.
///
/// `prediction` is the raw probability of class 1; thresholding is left to the
/// consumer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryGridPoint {
    pub x: f64,
    pub y: f64,
    pub prediction: f64,
}

#[derive(Debug, Clone)]
pub struct MlpClassifier {
    net: TwoLayerNet,
    learning_rate: f64,
    rng: StdRng,
    scratch: Scratch,
    history: TrainingHistory<MlpParameters>,
}

impl MlpClassifier {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_HIDDEN_SIZE: usize = 4;

    /// Default learning rate and hidden size, seeded.
    pub fn with_defaults(seed: u64) -> Result<Self> {
        Self::new_with_seed(Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_HIDDEN_SIZE, seed)
    }

    pub fn new_with_seed(learning_rate: f64, hidden_size: usize, seed: u64) -> Result<Self> {
        Self::new_with_rng(learning_rate, hidden_size, StdRng::seed_from_u64(seed))
    }

    pub fn new_with_rng(learning_rate: f64, hidden_size: usize, mut rng: StdRng) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let net = TwoLayerNet::new_with_rng(hidden_size, 1, &mut rng)?;
        Ok(Self::assemble(net, learning_rate, rng))
    }

    /// Start from explicit parameters (`weights2` must be `H x 1`); `reset`
    /// draws from `seed`.
    pub fn from_parameters(learning_rate: f64, params: &MlpParameters, seed: u64) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let net = TwoLayerNet::from_parameters(params, 1)?;
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

    fn probability_with(&self, x: Point, scratch: &mut Scratch) -> f64 {
        self.net.forward(&x, &mut scratch.hidden, &mut scratch.logits);
        sigmoid(scratch.logits[0])
    }
}

impl Classifier for MlpClassifier {
    type Prediction = f64;
    type Parameters = MlpParameters;
    type Boundary = Vec<BinaryGridPoint>;

    const NUM_CLASSES: usize = 2;

    fn predict(&self, x: Point) -> f64 {
        self.probability_with(x, &mut self.net.scratch())
    }

    fn predict_class(&self, x: Point) -> usize {
        threshold(self.predict(x))
    }

    fn sample_loss(&self, sample: &Sample) -> f64 {
        binary_cross_entropy(self.predict(sample.features), sample.label)
    }

    fn score_each<F>(&self, data: &Dataset, mut f: F)
    where
        F: FnMut(&Sample, f64, usize),
    {
        let mut scratch = self.net.scratch();
        for sample in data {
            let p = self.probability_with(sample.features, &mut scratch);
            f(sample, binary_cross_entropy(p, sample.label), threshold(p));
        }
    }

    fn train_step(&mut self, data: &Dataset) -> Result<StepMetrics> {
        data.check_labels(Self::NUM_CLASSES)?;

        let lr = self.learning_rate;
        let mut tally = Tally::default();
        for sample in data {
            let x = sample.features;
            let s = &mut self.scratch;
            self.net.forward(&x, &mut s.hidden, &mut s.logits);
            let p = sigmoid(s.logits[0]);
            tally.add(
                binary_cross_entropy(p, sample.label),
                threshold(p) == sample.label,
            );

            s.d_logits[0] = binary_output_error(p, sample.label);
            self.net.backprop_step(&x, s, lr);
        }

        let (loss, accuracy) = tally.finish();
        let net = &self.net;
        self.history
            .record_epoch(loss, accuracy, || net.parameters());
        tracing::debug!(
            model = "mlp",
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

    fn decision_boundary(&self, bounds: Bounds, resolution: usize) -> Result<Vec<BinaryGridPoint>> {
        let mut scratch = self.net.scratch();
        Ok(sample_points(bounds, resolution)?
            .into_iter()
            .map(|[x, y]| BinaryGridPoint {
                x,
                y,
                prediction: self.probability_with([x, y], &mut scratch),
            })
            .collect())
    }
}
