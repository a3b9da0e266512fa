//! Small from-scratch classifiers for watching catastrophic forgetting happen.
//!
//! `forgetting-mlp` trains tiny models on 2-D points, one task after another,
//! and measures how much of the first task survives training on the second.
//! Three models share one [`Classifier`] interface:
//!
//! - [`LinearClassifier`]: logistic regression, 2 classes.
//! - [`MlpClassifier`]: `2 -> H (sigmoid) -> 1 (sigmoid)`, 2 classes.
//! - [`MulticlassMlp`]: `2 -> H (sigmoid) -> 4 (softmax)`, 4 classes.
//!
//! # Training semantics
//!
//! - Scalars are `f64`; inputs are [`Point`]s (`[f64; 2]`).
//! - A training step is one pass over a [`Dataset`] with an online parameter
//!   update after every sample. Per sample, all errors are computed from the
//!   current parameters before any of them change.
//! - Weights start in `U[-0.1, 0.1]`, biases in `U[-0.05, 0.05]`, drawn from a
//!   seeded `StdRng` owned by the classifier. `reset` continues that stream.
//! - Every step appends to a [`TrainingHistory`]: one loss and one accuracy per
//!   epoch, plus a parameter snapshot every [`SNAPSHOT_INTERVAL`] epochs.
//!
//! # Panics vs `Result`
//!
//! Public entry points validate their input and return [`Result`]: learning
//! rates, hidden sizes, labels, bounds and parameter shapes are all checked
//! before any state is mutated. The numeric helpers in [`activation`] and
//! [`loss`] are infallible and only reached after validation.
//!
//! # Quick start
//!
//! ```rust
//! use forgetting_mlp::{Classifier, MlpClassifier, datasets};
//!
//! # fn main() -> forgetting_mlp::Result<()> {
//! let task1 = datasets::binary_task1();
//! let task2 = datasets::binary_task2();
//!
//! let mut model = MlpClassifier::new_with_seed(0.1, 4, 0)?;
//! model.train(&task1, 50)?;
//! let before = model.evaluate(&task1)?.accuracy;
//!
//! model.train(&task2, 50)?;
//! let after = model.evaluate(&task1)?.accuracy;
//! assert!(after < before);
//! # Ok(())
//! # }
//! ```
//!
//! # Three-phase driver
//!
//! ```rust
//! use forgetting_mlp::{ExperimentConfig, Variant, run_experiment};
//!
//! # fn main() -> forgetting_mlp::Result<()> {
//! let report = run_experiment(&ExperimentConfig::for_variant(Variant::Multiclass))?;
//! println!("task 1 accuracy dropped by {:.1}%", report.accuracy_drop() * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod classifier;
pub mod config;
pub mod data;
pub mod datasets;
pub mod error;
pub mod grid;
pub mod history;
pub mod layer;
pub mod linear;
pub mod loss;
pub mod metrics;
pub mod mlp;
pub mod multiclass;
pub(crate) mod network;
pub mod train;

pub use classifier::Classifier;
pub use config::{ConfigOverrides, ExperimentConfig, Variant};
pub use data::{Dataset, INPUT_DIM, Point, Sample};
pub use error::{Error, Result};
pub use grid::{Bounds, sample_points};
pub use history::{SNAPSHOT_INTERVAL, TrainingHistory, WeightSnapshot};
pub use layer::{Init, Layer};
pub use linear::{LinearBoundary, LinearClassifier, LinearParameters};
pub use metrics::{ClassReport, EvalReport, Metrics, StepMetrics, WeightMagnitudes};
pub use mlp::{BinaryGridPoint, MlpClassifier};
pub use multiclass::{MulticlassGridPoint, MulticlassMlp, Probabilities};
pub use network::MlpParameters;
pub use train::{
    ForgettingReport, Phase, PhaseReport, Severity, TrainingDriver, run_experiment,
};
