//! Experiment configuration.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::validate_learning_rate;
use crate::{Error, LinearClassifier, MlpClassifier, MulticlassMlp, Result};

/// Which classifier an experiment runs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Single-layer logistic classifier on the binary tasks.
    Linear,
    /// Binary MLP on the binary tasks.
    Mlp,
    /// 4-class MLP on the quadrant tasks.
    #[default]
    Multiclass,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Linear, Variant::Mlp, Variant::Multiclass];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Linear => "linear",
            Variant::Mlp => "mlp",
            Variant::Multiclass => "multiclass",
        }
    }

    pub fn uses_hidden_layer(self) -> bool {
        !matches!(self, Variant::Linear)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Variant::Linear),
            "mlp" | "binary" => Ok(Variant::Mlp),
            "multiclass" | "mlp-4class" | "4class" => Ok(Variant::Multiclass),
            other => Err(Error::InvalidConfig(format!(
                "unknown variant {other:?} (expected linear, mlp or multiclass)"
            ))),
        }
    }
}

/// Settings for one three-phase forgetting experiment.
///
/// Deserializing goes through [`ConfigOverrides`], so fields missing from the
/// input take the preset of the (possibly defaulted) variant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ConfigOverrides"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub variant: Variant,
    pub learning_rate: f64,
    /// Hidden width; ignored by [`Variant::Linear`].
    pub hidden_size: usize,
    /// Training epochs on each task.
    pub epochs_per_phase: usize,
    /// Progress is logged every this many epochs.
    pub log_interval: usize,
    pub seed: u64,
}

impl ExperimentConfig {
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_LOG_INTERVAL: usize = 10;

    /// Preset that reliably shows forgetting for `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        let (learning_rate, hidden_size, epochs_per_phase) = match variant {
            Variant::Linear => (0.05, 0, 50),
            Variant::Mlp => (0.1, MlpClassifier::DEFAULT_HIDDEN_SIZE, 50),
            Variant::Multiclass => (0.15, MulticlassMlp::DEFAULT_HIDDEN_SIZE, 60),
        };
        Self {
            variant,
            learning_rate,
            hidden_size,
            epochs_per_phase,
            log_interval: Self::DEFAULT_LOG_INTERVAL,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_learning_rate(self.learning_rate)?;
        if self.variant.uses_hidden_layer() && self.hidden_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "hidden_size must be > 0 for the {} variant",
                self.variant
            )));
        }
        if self.epochs_per_phase == 0 {
            return Err(Error::InvalidConfig(
                "epochs_per_phase must be > 0".to_owned(),
            ));
        }
        if self.log_interval == 0 {
            return Err(Error::InvalidConfig("log_interval must be > 0".to_owned()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take the preset of the
    /// config's variant.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        ConfigOverrides::from_json_str(json)?.resolve()
    }

    pub fn linear(&self) -> Result<LinearClassifier> {
        LinearClassifier::new_with_seed(self.learning_rate, self.seed)
    }

    pub fn mlp(&self) -> Result<MlpClassifier> {
        MlpClassifier::new_with_seed(self.learning_rate, self.hidden_size, self.seed)
    }

    pub fn multiclass(&self) -> Result<MulticlassMlp> {
        MulticlassMlp::new_with_seed(self.learning_rate, self.hidden_size, self.seed)
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

/// A partial [`ExperimentConfig`]: the fields a config file or command line
/// actually set.
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigOverrides {
    pub variant: Option<Variant>,
    pub learning_rate: Option<f64>,
    pub hidden_size: Option<usize>,
    pub epochs_per_phase: Option<usize>,
    pub log_interval: Option<usize>,
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("config json: {e}")))
    }

    /// Fields set in `later` win over fields set in `self`.
    pub fn merge(self, later: Self) -> Self {
        Self {
            variant: later.variant.or(self.variant),
            learning_rate: later.learning_rate.or(self.learning_rate),
            hidden_size: later.hidden_size.or(self.hidden_size),
            epochs_per_phase: later.epochs_per_phase.or(self.epochs_per_phase),
            log_interval: later.log_interval.or(self.log_interval),
            seed: later.seed.or(self.seed),
        }
    }

    /// Start from the preset of the chosen variant, apply the set fields and
    /// validate.
    pub fn resolve(self) -> Result<ExperimentConfig> {
        let mut cfg = ExperimentConfig::for_variant(self.variant.unwrap_or_default());
        if let Some(lr) = self.learning_rate {
            cfg.learning_rate = lr;
        }
        if let Some(hidden) = self.hidden_size {
            cfg.hidden_size = hidden;
        }
        if let Some(epochs) = self.epochs_per_phase {
            cfg.epochs_per_phase = epochs;
        }
        if let Some(interval) = self.log_interval {
            cfg.log_interval = interval;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

impl TryFrom<ConfigOverrides> for ExperimentConfig {
    type Error = Error;

    fn try_from(overrides: ConfigOverrides) -> Result<Self> {
        overrides.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for v in Variant::ALL {
            let cfg = ExperimentConfig::for_variant(v);
            cfg.validate().unwrap();
            assert_eq!(cfg.variant, v);
        }
        assert_eq!(ExperimentConfig::default().variant, Variant::Multiclass);
        assert_eq!(ExperimentConfig::for_variant(Variant::Multiclass).hidden_size, 8);
    }

    #[test]
    fn hidden_size_only_matters_for_mlps() {
        let mut cfg = ExperimentConfig::for_variant(Variant::Linear);
        cfg.hidden_size = 0;
        assert!(cfg.validate().is_ok());

        let mut cfg = ExperimentConfig::for_variant(Variant::Mlp);
        cfg.hidden_size = 0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_epochs_and_bad_rate() {
        let mut cfg = ExperimentConfig::default();
        cfg.epochs_per_phase = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ExperimentConfig::default();
        cfg.learning_rate = -0.1;
        assert!(cfg.validate().is_err());

        let mut cfg = ExperimentConfig::default();
        cfg.log_interval = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn variant_parses_common_spellings() {
        assert_eq!("Linear".parse::<Variant>().unwrap(), Variant::Linear);
        assert_eq!("mlp".parse::<Variant>().unwrap(), Variant::Mlp);
        assert_eq!("mlp-4class".parse::<Variant>().unwrap(), Variant::Multiclass);
        assert!("cnn".parse::<Variant>().is_err());
        for v in Variant::ALL {
            assert_eq!(v.to_string().parse::<Variant>().unwrap(), v);
        }
    }

    #[test]
    fn builds_classifiers_from_config() {
        let cfg = ExperimentConfig::for_variant(Variant::Mlp);
        let model = cfg.mlp().unwrap();
        assert_eq!(model.hidden_size(), 4);
        assert_eq!(model.learning_rate(), 0.1);
        assert_eq!(cfg.linear().unwrap().learning_rate(), 0.1);
    }

    #[test]
    fn overrides_start_from_their_own_variant_preset() {
        let linear = ConfigOverrides {
            variant: Some(Variant::Linear),
            ..Default::default()
        };
        assert_eq!(
            linear.resolve().unwrap(),
            ExperimentConfig::for_variant(Variant::Linear)
        );
        assert_eq!(
            ConfigOverrides::default().resolve().unwrap(),
            ExperimentConfig::default()
        );

        let file = ConfigOverrides {
            variant: Some(Variant::Multiclass),
            seed: Some(3),
            epochs_per_phase: Some(12),
            ..Default::default()
        };
        let flags = ConfigOverrides {
            variant: Some(Variant::Mlp),
            epochs_per_phase: Some(20),
            ..Default::default()
        };
        let cfg = file.merge(flags).resolve().unwrap();
        assert_eq!(cfg.variant, Variant::Mlp);
        assert_eq!(cfg.epochs_per_phase, 20);
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.hidden_size, MlpClassifier::DEFAULT_HIDDEN_SIZE);
        assert_eq!(cfg.learning_rate, 0.1);

        let bad = ConfigOverrides {
            hidden_size: Some(0),
            ..flags
        };
        assert!(matches!(bad.resolve(), Err(Error::InvalidConfig(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_partial_json() {
        let cfg =
            ExperimentConfig::from_json_str(r#"{"variant":"mlp","learning_rate":0.2,"seed":7}"#)
                .unwrap();
        assert_eq!(cfg.variant, Variant::Mlp);
        assert_eq!(cfg.learning_rate, 0.2);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.epochs_per_phase, 50);
        assert_eq!(cfg.hidden_size, 4);

        let linear = ExperimentConfig::from_json_str(r#"{"variant":"linear"}"#).unwrap();
        assert_eq!(linear, ExperimentConfig::for_variant(Variant::Linear));

        let direct: ExperimentConfig = serde_json::from_str(r#"{"variant":"linear"}"#).unwrap();
        assert_eq!(direct, linear);
        assert!(serde_json::from_str::<ExperimentConfig>(r#"{"log_interval":0}"#).is_err());

        let full = serde_json::to_string(&ExperimentConfig::for_variant(Variant::Mlp)).unwrap();
        assert_eq!(
            ExperimentConfig::from_json_str(&full).unwrap(),
            ExperimentConfig::for_variant(Variant::Mlp)
        );

        assert!(ExperimentConfig::from_json_str(r#"{"epochs_per_phase":0}"#).is_err());
        assert!(ExperimentConfig::from_json_str("not json").is_err());
    }
}
