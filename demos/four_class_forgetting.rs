use forgetting_mlp::datasets::{class_name, quadrant_task1, quadrant_task2};
use forgetting_mlp::{Classifier, ExperimentConfig, TrainingDriver, Variant};

fn main() -> forgetting_mlp::Result<()> {
    let cfg = ExperimentConfig::for_variant(Variant::Multiclass);
    let mut driver = TrainingDriver::new(cfg.multiclass()?, quadrant_task1(), quadrant_task2())?
        .with_log_interval(cfg.log_interval)?;

    for _ in 0..2 {
        let phase = driver.phase();
        let report = driver.run_phase(cfg.epochs_per_phase)?;
        println!(
            "{phase}: loss={:.4} accuracy={:.1}%",
            report.eval.loss,
            report.eval.accuracy * 100.0
        );
    }

    let report = driver.review()?;
    for c in &report.task1_after_classes {
        println!(
            "  {:<6} {:>5.1}%",
            class_name(c.class).unwrap_or("?"),
            c.report.accuracy * 100.0
        );
    }
    println!(
        "task 1: {:.1}% -> {:.1}%, {} forgetting",
        report.task1_before.accuracy * 100.0,
        report.task1_after.accuracy * 100.0,
        report.severity()
    );

    let snapshots = driver.classifier().history().snapshots().len();
    println!("{snapshots} weight snapshots recorded");
    Ok(())
}
