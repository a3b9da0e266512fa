//! Three-phase forgetting experiment.
//!
//! Phase 1 trains on task 1, phase 2 trains the same parameters on task 2, and
//! the review phase re-measures task 1 without any further training. The drop
//! in task-1 accuracy between the end of phase 1 and the review is the
//! forgetting the experiment is about.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::config::{ExperimentConfig, Variant};
use crate::datasets::{binary_task1, binary_task2, quadrant_task1, quadrant_task2};
use crate::metrics::{ClassReport, EvalReport, StepMetrics};
use crate::{Dataset, Error, Result};

/// Accuracy drop above which forgetting counts as severe.
pub const SEVERE_DROP: f64 = 0.3;
/// Accuracy drop above which forgetting counts as moderate.
pub const MODERATE_DROP: f64 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Task1,
    Task2,
    Review,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Task1 => f.write_str("phase 1 (task 1)"),
            Phase::Task2 => f.write_str("phase 2 (task 2)"),
            Phase::Review => f.write_str("phase 3 (review task 1)"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Severe,
    Moderate,
    Minimal,
}

impl Severity {
    pub fn from_drop(drop: f64) -> Self {
        if drop > SEVERE_DROP {
            Severity::Severe
        } else if drop > MODERATE_DROP {
            Severity::Moderate
        } else {
            Severity::Minimal
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Severe => f.write_str("severe"),
            Severity::Moderate => f.write_str("moderate"),
            Severity::Minimal => f.write_str("minimal"),
        }
    }
}

/// Outcome of one training phase.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub epochs: usize,
    /// Metrics of the last training epoch (measured while parameters moved).
    pub last_epoch: StepMetrics,
    /// The phase's dataset re-evaluated with the final parameters.
    pub eval: EvalReport,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ForgettingReport {
    /// Task 1 measured at the end of phase 1.
    pub task1_before: EvalReport,
    /// Task 2 measured at the end of phase 2.
    pub task2: EvalReport,
    /// Task 1 measured in the review phase.
    pub task1_after: EvalReport,
    /// Per-class breakdown of `task1_after`.
    pub task1_after_classes: Vec<ClassReport>,
    /// Both tasks together, measured in the review phase.
    pub combined: EvalReport,
}

impl ForgettingReport {
    /// `task1_before.accuracy - task1_after.accuracy`; negative if task 1 improved.
    pub fn accuracy_drop(&self) -> f64 {
        self.task1_before.accuracy - self.task1_after.accuracy
    }

    pub fn severity(&self) -> Severity {
        Severity::from_drop(self.accuracy_drop())
    }
}

/// Drives one classifier through the task 1 / task 2 / review sequence.
#[derive(Debug, Clone)]
pub struct TrainingDriver<C> {
    classifier: C,
    task1: Dataset,
    task2: Dataset,
    phase: Phase,
    log_interval: usize,
    task1_before: Option<EvalReport>,
    task2_after: Option<EvalReport>,
}

impl<C: Classifier> TrainingDriver<C> {
    /// Both datasets are checked against the classifier's class count up front.
    pub fn new(classifier: C, task1: Dataset, task2: Dataset) -> Result<Self> {
        task1.check_labels(C::NUM_CLASSES)?;
        task2.check_labels(C::NUM_CLASSES)?;
        Ok(Self {
            classifier,
            task1,
            task2,
            phase: Phase::Task1,
            log_interval: ExperimentConfig::DEFAULT_LOG_INTERVAL,
            task1_before: None,
            task2_after: None,
        })
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Result<Self> {
        if log_interval == 0 {
            return Err(Error::InvalidConfig("log_interval must be > 0".to_owned()));
        }
        self.log_interval = log_interval;
        Ok(self)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn into_classifier(self) -> C {
        self.classifier
    }

    /// Dataset the current phase trains on (task 1 again during review).
    pub fn current_dataset(&self) -> &Dataset {
        match self.phase {
            Phase::Task1 | Phase::Review => &self.task1,
            Phase::Task2 => &self.task2,
        }
    }

    /// Train one epoch on the current phase's dataset.
    pub fn step(&mut self) -> Result<StepMetrics> {
        match self.phase {
            Phase::Task1 => self.classifier.train_step(&self.task1),
            Phase::Task2 => self.classifier.train_step(&self.task2),
            Phase::Review => Err(Error::InvalidConfig(
                "the review phase does not train; call reset to start over".to_owned(),
            )),
        }
    }

    /// Measure the current task and move to the next phase.
    pub fn finish_phase(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Task1 => {
                self.task1_before = Some(self.classifier.evaluate(&self.task1)?);
                self.phase = Phase::Task2;
            }
            Phase::Task2 => {
                self.task2_after = Some(self.classifier.evaluate(&self.task2)?);
                self.phase = Phase::Review;
            }
            Phase::Review => {
                return Err(Error::InvalidConfig(
                    "the review phase is the last phase".to_owned(),
                ));
            }
        }
        tracing::info!(phase = %self.phase, "entering phase");
        Ok(self.phase)
    }

    /// Train `epochs` epochs on the current task, then [`finish_phase`](Self::finish_phase).
    pub fn run_phase(&mut self, epochs: usize) -> Result<PhaseReport> {
        let phase = self.phase;
        if phase == Phase::Review {
            return Err(Error::InvalidConfig(
                "the review phase does not train".to_owned(),
            ));
        }
        let data = match phase {
            Phase::Task2 => &self.task2,
            _ => &self.task1,
        };
        tracing::info!(%phase, samples = data.len(), epochs, "training");

        let log_interval = self.log_interval;
        let last_epoch = self.classifier.train_with(data, epochs, |m, i| {
            if i % log_interval == 0 {
                tracing::info!(%phase, epoch = i, loss = m.loss, accuracy = m.accuracy, "progress");
            }
        })?;
        let magnitudes = self.classifier.weight_magnitudes();
        tracing::info!(
            %phase,
            hidden_magnitude = magnitudes.hidden,
            output_magnitude = magnitudes.output,
            "weights"
        );

        self.finish_phase()?;
        let eval = match phase {
            Phase::Task2 => self.task2_after,
            _ => self.task1_before,
        }
        .ok_or_else(|| Error::InvalidConfig("phase finished without an evaluation".to_owned()))?;
        tracing::info!(%phase, loss = eval.loss, accuracy = eval.accuracy, "phase complete");

        Ok(PhaseReport {
            phase,
            epochs,
            last_epoch,
            eval,
        })
    }

    /// Re-measure task 1 with the current parameters. Only valid in the review phase.
    pub fn review(&self) -> Result<ForgettingReport> {
        let (Phase::Review, Some(task1_before), Some(task2)) =
            (self.phase, self.task1_before, self.task2_after)
        else {
            return Err(Error::InvalidConfig(
                "review requires both training phases to be finished".to_owned(),
            ));
        };

        let report = ForgettingReport {
            task1_before,
            task2,
            task1_after: self.classifier.evaluate(&self.task1)?,
            task1_after_classes: self.classifier.evaluate_per_class(&self.task1)?,
            combined: self.classifier.evaluate(&self.task1.concat(&self.task2))?,
        };

        let drop = report.accuracy_drop();
        match report.severity() {
            Severity::Minimal => tracing::info!(
                before = task1_before.accuracy,
                after = report.task1_after.accuracy,
                drop,
                "minimal forgetting"
            ),
            severity => tracing::warn!(
                before = task1_before.accuracy,
                after = report.task1_after.accuracy,
                drop,
                %severity,
                "catastrophic forgetting"
            ),
        }
        Ok(report)
    }

    /// Both training phases with `epochs_per_phase` epochs each, then the review.
    pub fn run(&mut self, epochs_per_phase: usize) -> Result<ForgettingReport> {
        if self.phase != Phase::Task1 {
            return Err(Error::InvalidConfig(
                "run must start from phase 1; call reset first".to_owned(),
            ));
        }
        self.run_phase(epochs_per_phase)?;
        self.run_phase(epochs_per_phase)?;
        self.review()
    }

    /// Re-randomize the classifier and return to phase 1.
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.phase = Phase::Task1;
        self.task1_before = None;
        self.task2_after = None;
    }
}

/// Run the full experiment described by `cfg` on the bundled tasks for its variant.
pub fn run_experiment(cfg: &ExperimentConfig) -> Result<ForgettingReport> {
    cfg.validate()?;
    tracing::info!(variant = %cfg.variant, seed = cfg.seed, lr = cfg.learning_rate, "starting experiment");
    match cfg.variant {
        Variant::Linear => TrainingDriver::new(cfg.linear()?, binary_task1(), binary_task2())?
            .with_log_interval(cfg.log_interval)?
            .run(cfg.epochs_per_phase),
        Variant::Mlp => TrainingDriver::new(cfg.mlp()?, binary_task1(), binary_task2())?
            .with_log_interval(cfg.log_interval)?
            .run(cfg.epochs_per_phase),
        Variant::Multiclass => {
            TrainingDriver::new(cfg.multiclass()?, quadrant_task1(), quadrant_task2())?
                .with_log_interval(cfg.log_interval)?
                .run(cfg.epochs_per_phase)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LinearClassifier, MlpClassifier, MulticlassMlp};

    fn mlp_driver(seed: u64) -> TrainingDriver<MlpClassifier> {
        TrainingDriver::new(
            MlpClassifier::new_with_seed(0.1, 4, seed).unwrap(),
            binary_task1(),
            binary_task2(),
        )
        .unwrap()
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::from_drop(0.31), Severity::Severe);
        assert_eq!(Severity::from_drop(0.3), Severity::Moderate);
        assert_eq!(Severity::from_drop(0.1), Severity::Minimal);
        assert_eq!(Severity::from_drop(-0.5), Severity::Minimal);
    }

    #[test]
    fn phases_advance_in_order() {
        let mut driver = mlp_driver(0);
        assert_eq!(driver.phase(), Phase::Task1);
        assert!(driver.review().is_err());

        driver.step().unwrap();
        assert_eq!(driver.classifier().history().epoch(), 1);
        assert_eq!(driver.finish_phase().unwrap(), Phase::Task2);
        assert_eq!(driver.current_dataset(), &binary_task2());
        assert_eq!(driver.finish_phase().unwrap(), Phase::Review);

        let epoch = driver.classifier().history().epoch();
        assert!(driver.step().is_err());
        assert!(driver.finish_phase().is_err());
        assert_eq!(driver.classifier().history().epoch(), epoch);
        driver.review().unwrap();
    }

    #[test]
    fn run_reports_forgetting_for_binary_mlp() {
        let mut driver = mlp_driver(3);
        let report = driver.run(50).unwrap();
        assert!(report.task1_before.accuracy >= 0.9);
        assert!(report.task1_after.accuracy < report.task1_before.accuracy);
        assert!(report.accuracy_drop() > 0.0);
        assert_eq!(report.task1_after_classes.len(), 2);
        assert_eq!(driver.classifier().history().epoch(), 100);
        assert!(driver.run(5).is_err());
    }

    #[test]
    fn reset_returns_to_phase_one() {
        let mut driver = mlp_driver(1);
        driver.run_phase(5).unwrap();
        driver.reset();
        assert_eq!(driver.phase(), Phase::Task1);
        assert_eq!(driver.classifier().history().epoch(), 0);
        assert!(driver.review().is_err());
        driver.run(5).unwrap();
    }

    #[test]
    fn rejects_labels_outside_the_classifier_range() {
        let linear = LinearClassifier::new_with_seed(0.05, 0).unwrap();
        assert!(matches!(
            TrainingDriver::new(linear, quadrant_task1(), quadrant_task2()),
            Err(Error::InvalidData(_))
        ));
        let mc = MulticlassMlp::new_with_seed(0.1, 8, 0).unwrap();
        assert!(TrainingDriver::new(mc, binary_task1(), binary_task2()).is_ok());
    }

    #[test]
    fn run_phase_reports_final_evaluation() {
        let mut driver = mlp_driver(2).with_log_interval(5).unwrap();
        let report = driver.run_phase(20).unwrap();
        assert_eq!(report.phase, Phase::Task1);
        assert_eq!(report.epochs, 20);
        assert_eq!(
            report.eval,
            driver.classifier().evaluate(&binary_task1()).unwrap()
        );
        assert!(mlp_driver(0).with_log_interval(0).is_err());
    }

    #[test]
    fn experiment_presets_show_forgetting() {
        for variant in Variant::ALL {
            let report = run_experiment(&ExperimentConfig::for_variant(variant)).unwrap();
            assert!(report.task1_before.accuracy >= 0.9, "{variant}");
            assert!(report.accuracy_drop() > 0.0, "{variant}");
        }
    }
}
