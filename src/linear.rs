//! Single-layer logistic classifier.
//!
//! `p(class 1 | x) = sigmoid(w . x + b)`, trained with binary cross-entropy.
//! Parameters are updated after every sample (online gradient descent), so the
//! model changes between samples of the same epoch.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activation::{sigmoid, threshold};
use crate::classifier::Classifier;
use crate::error::validate_learning_rate;
use crate::history::TrainingHistory;
use crate::layer::{Init, saturating_term};
use crate::loss::{binary_cross_entropy, binary_output_error};
use crate::metrics::{StepMetrics, Tally, WeightMagnitudes};
use crate::{Bounds, Dataset, Error, Point, Result, Sample};

/// Below this magnitude a weight is treated as zero when solving for the boundary.
pub const BOUNDARY_EPSILON: f64 = 1e-10;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearParameters {
    pub weights: [f64; 2],
    pub bias: f64,
}

/// The line `w . x + b = 0` clipped to the requested x-range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearBoundary {
    /// `weights[1]` is (numerically) zero: the boundary is `x = -bias / weights[0]`.
    Vertical { x: f64 },
    /// Endpoints at `x_min` and `x_max`.
    Line { start: Point, end: Point },
    /// Both weights are (numerically) zero: the prediction is the same everywhere.
    Constant,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    params: LinearParameters,
    learning_rate: f64,
    rng: StdRng,
    history: TrainingHistory<LinearParameters>,
}

impl LinearClassifier {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

    /// Default learning rate, seeded.
    pub fn with_defaults(seed: u64) -> Result<Self> {
        Self::new_with_seed(Self::DEFAULT_LEARNING_RATE, seed)
    }

    pub fn new_with_seed(learning_rate: f64, seed: u64) -> Result<Self> {
        Self::new_with_rng(learning_rate, StdRng::seed_from_u64(seed))
    }

    pub fn new_with_rng(learning_rate: f64, mut rng: StdRng) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let params = random_parameters(&mut rng);
        Ok(Self {
            params,
            learning_rate,
            rng,
            history: TrainingHistory::new(params),
        })
    }

    /// Start from explicit parameters; `reset` will still draw from `seed`.
    pub fn from_parameters(learning_rate: f64, params: LinearParameters, seed: u64) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        if !(params.weights.iter().all(|w| w.is_finite()) && params.bias.is_finite()) {
            return Err(Error::InvalidData(
                "linear parameters must be finite".to_owned(),
            ));
        }
        Ok(Self {
            params,
            learning_rate,
            rng: StdRng::seed_from_u64(seed),
            history: TrainingHistory::new(params),
        })
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    fn probability(&self, x: Point) -> f64 {
        let LinearParameters { weights, bias } = self.params;
        let z = saturating_term(weights[0], x[0]) + saturating_term(weights[1], x[1]) + bias;
        sigmoid(z)
    }
}

fn random_parameters(rng: &mut StdRng) -> LinearParameters {
    let init = Init::default();
    let w = Uniform::new_inclusive(-init.weight, init.weight);
    let b = Uniform::new_inclusive(-init.bias, init.bias);
    LinearParameters {
        weights: [w.sample(rng), w.sample(rng)],
        bias: b.sample(rng),
    }
}

impl Classifier for LinearClassifier {
    type Prediction = f64;
    type Parameters = LinearParameters;
    type Boundary = LinearBoundary;

    const NUM_CLASSES: usize = 2;

    #[inline]
    fn predict(&self, x: Point) -> f64 {
        self.probability(x)
    }

    #[inline]
    fn predict_class(&self, x: Point) -> usize {
        threshold(self.probability(x))
    }

    fn sample_loss(&self, sample: &Sample) -> f64 {
        binary_cross_entropy(self.probability(sample.features), sample.label)
    }

    fn score_each<F>(&self, data: &Dataset, mut f: F)
    where
        F: FnMut(&Sample, f64, usize),
    {
        for sample in data {
            let p = self.probability(sample.features);
            f(sample, binary_cross_entropy(p, sample.label), threshold(p));
        }
    }

    fn train_step(&mut self, data: &Dataset) -> Result<StepMetrics> {
        data.check_labels(Self::NUM_CLASSES)?;

        let lr = self.learning_rate;
        let mut tally = Tally::default();
        for sample in data {
            let x = sample.features;
            let p = self.probability(x);
            tally.add(
                binary_cross_entropy(p, sample.label),
                threshold(p) == sample.label,
            );

            let error = binary_output_error(p, sample.label);
            self.params.weights[0] -= lr * error * x[0];
            self.params.weights[1] -= lr * error * x[1];
            self.params.bias -= lr * error;
        }

        let (loss, accuracy) = tally.finish();
        let params = self.params;
        self.history.record_epoch(loss, accuracy, || params);
        tracing::debug!(
            model = "linear",
            epoch = self.history.epoch(),
            loss,
            accuracy,
            "epoch complete"
        );
        Ok(StepMetrics { loss, accuracy })
    }

    fn reset(&mut self) {
        self.params = random_parameters(&mut self.rng);
        self.history = TrainingHistory::new(self.params);
    }

    #[inline]
    fn history(&self) -> &TrainingHistory<LinearParameters> {
        &self.history
    }

    #[inline]
    fn parameters(&self) -> LinearParameters {
        self.params
    }

    /// A single layer has no hidden weights; its norm is reported as `output`.
    fn weight_magnitudes(&self) -> WeightMagnitudes {
        let [w0, w1] = self.params.weights;
        WeightMagnitudes {
            hidden: 0.0,
            output: (w0 * w0 + w1 * w1).sqrt(),
        }
    }

    fn decision_boundary(&self, bounds: Bounds, _resolution: usize) -> Result<LinearBoundary> {
        bounds.validate()?;
        let LinearParameters {
            weights: [w0, w1],
            bias,
        } = self.params;

        if w1.abs() < BOUNDARY_EPSILON {
            if w0.abs() < BOUNDARY_EPSILON {
                return Ok(LinearBoundary::Constant);
            }
            return Ok(LinearBoundary::Vertical { x: -bias / w0 });
        }

        let y_at = |x: f64| -(w0 * x + bias) / w1;
        Ok(LinearBoundary::Line {
            start: [bounds.x_min, y_at(bounds.x_min)],
            end: [bounds.x_max, y_at(bounds.x_max)],
        })
    }
}
