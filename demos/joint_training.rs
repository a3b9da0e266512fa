use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use forgetting_mlp::datasets::{quadrant_all, quadrant_task1, quadrant_task2};
use forgetting_mlp::{Classifier, Dataset, MulticlassMlp, Sample};

fn main() -> forgetting_mlp::Result<()> {
    // Interleaving both tasks is the baseline that does not forget.
    let mut joint = MulticlassMlp::new_with_seed(0.1, 8, 0)?;
    joint.train(&quadrant_all(), 300)?;

    let mut sequential = MulticlassMlp::new_with_seed(0.1, 8, 0)?;
    sequential.train(&quadrant_task1(), 150)?;
    sequential.train(&quadrant_task2(), 150)?;

    // Held-out points jittered around the quadrant centers.
    let mut rng = StdRng::seed_from_u64(0);
    let centers = [[1.75, 6.75], [6.75, 1.75], [6.75, 6.75], [1.75, 1.75]];
    let mut samples = Vec::new();
    for (class, center) in centers.iter().enumerate() {
        for _ in 0..25 {
            let x = center[0] + rng.gen_range(-0.75..0.75);
            let y = center[1] + rng.gen_range(-0.75..0.75);
            samples.push(Sample::new([x, y], class));
        }
    }
    let held_out = Dataset::new(samples)?;

    for (name, model) in [("joint", &joint), ("sequential", &sequential)] {
        let eval = model.evaluate(&held_out)?;
        println!(
            "{name:>10}: held-out loss={:.4} accuracy={:.1}%",
            eval.loss,
            eval.accuracy * 100.0
        );
        for c in model.evaluate_per_class(&held_out)? {
            println!("            class {} {:>5.1}%", c.class, c.report.accuracy * 100.0);
        }
    }
    Ok(())
}
