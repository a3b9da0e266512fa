use forgetting_mlp::datasets::{binary_task1, binary_task2};
use forgetting_mlp::{Bounds, Classifier, MlpClassifier};

/// Coarse text map of the decision surface, top row = largest y.
fn render(model: &MlpClassifier, resolution: usize) -> forgetting_mlp::Result<String> {
    let grid = model.decision_boundary(Bounds::DEMO, resolution)?;
    let n = resolution + 1;
    let mut out = String::new();
    for row in (0..n).rev() {
        for col in 0..n {
            // Grid points are ordered x-major.
            let p = grid[col * n + row].prediction;
            out.push(if p >= 0.5 { '#' } else { '.' });
        }
        out.push('\n');
    }
    Ok(out)
}

fn main() -> forgetting_mlp::Result<()> {
    let task1 = binary_task1();
    let task2 = binary_task2();
    let mut model = MlpClassifier::new_with_seed(0.1, 4, 0)?;

    model.train_with(&task1, 50, |m, epoch| {
        if epoch % 10 == 0 {
            println!("task 1 epoch {epoch}: loss={:.4} acc={:.2}", m.loss, m.accuracy);
        }
    })?;
    let before = model.evaluate(&task1)?.accuracy;
    println!("{}", render(&model, 16)?);

    model.train(&task2, 50)?;
    let after = model.evaluate(&task1)?.accuracy;
    println!("{}", render(&model, 16)?);

    let mags = model.weight_magnitudes();
    println!(
        "task 1 accuracy {:.1}% -> {:.1}% (hidden |W|={:.3}, output |W|={:.3})",
        before * 100.0,
        after * 100.0,
        mags.hidden,
        mags.output
    );
    Ok(())
}
