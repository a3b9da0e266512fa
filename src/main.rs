use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use forgetting_mlp::datasets::class_name;
use forgetting_mlp::{
    ConfigOverrides, ExperimentConfig, ForgettingReport, Severity, Variant, run_experiment,
};

/// Train a classifier on task 1, then task 2, and measure what it forgot.
#[derive(Parser, Debug)]
#[command(name = "forgetting", version, about)]
struct Args {
    /// Classifier to run: linear, mlp or multiclass [default: multiclass].
    #[arg(long)]
    variant: Option<Variant>,

    /// Seed for parameter initialization [default: 42].
    #[arg(long)]
    seed: Option<u64>,

    /// Epochs per training phase (defaults to the variant's preset).
    #[arg(long)]
    epochs: Option<usize>,

    /// Learning rate (defaults to the variant's preset).
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Hidden layer width for the MLP variants.
    #[arg(long)]
    hidden_size: Option<usize>,

    /// Log training progress every N epochs.
    #[arg(long)]
    log_interval: Option<usize>,

    /// Read the experiment config from a JSON file; other flags override it.
    #[cfg(feature = "serde")]
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            variant: self.variant,
            learning_rate: self.learning_rate,
            hidden_size: self.hidden_size,
            epochs_per_phase: self.epochs,
            log_interval: self.log_interval,
            seed: self.seed,
        }
    }

    #[cfg(feature = "serde")]
    fn file_overrides(&self) -> forgetting_mlp::Result<ConfigOverrides> {
        let Some(path) = &self.config else {
            return Ok(ConfigOverrides::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| {
            forgetting_mlp::Error::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        ConfigOverrides::from_json_str(&json)
    }

    #[cfg(not(feature = "serde"))]
    fn file_overrides(&self) -> forgetting_mlp::Result<ConfigOverrides> {
        Ok(ConfigOverrides::default())
    }

    /// File values first, then explicit flags, on top of the chosen variant's preset.
    fn experiment_config(&self) -> forgetting_mlp::Result<ExperimentConfig> {
        self.file_overrides()?.merge(self.overrides()).resolve()
    }
}

fn print_summary(cfg: &ExperimentConfig, report: &ForgettingReport) {
    println!();
    println!("Forgetting summary ({} classifier, seed {})", cfg.variant, cfg.seed);
    println!(
        "  task 1 accuracy before task 2: {:>6.1}%",
        report.task1_before.accuracy * 100.0
    );
    println!(
        "  task 1 accuracy after task 2:  {:>6.1}%",
        report.task1_after.accuracy * 100.0
    );
    println!(
        "  task 2 accuracy:               {:>6.1}%",
        report.task2.accuracy * 100.0
    );
    println!(
        "  both tasks:                    {:>6.1}%",
        report.combined.accuracy * 100.0
    );

    println!("  task 1 per class after task 2:");
    for c in &report.task1_after_classes {
        let name = match cfg.variant {
            Variant::Multiclass => class_name(c.class).unwrap_or("?"),
            _ => "",
        };
        println!(
            "    class {} {:<7} {:>6.1}%  loss {:.4}  ({} samples)",
            c.class,
            name,
            c.report.accuracy * 100.0,
            c.report.loss,
            c.samples
        );
    }

    let verdict = match report.severity() {
        Severity::Severe => "severe catastrophic forgetting",
        Severity::Moderate => "moderate forgetting",
        Severity::Minimal => "minimal forgetting",
    };
    println!(
        "  drop: {:.1} points, {verdict}",
        report.accuracy_drop() * 100.0
    );
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let result = args
        .experiment_config()
        .and_then(|cfg| run_experiment(&cfg).map(|report| (cfg, report)));

    match result {
        Ok((cfg, report)) => {
            print_summary(&cfg, &report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "experiment failed");
            ExitCode::FAILURE
        }
    }
}
