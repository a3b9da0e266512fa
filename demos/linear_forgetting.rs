use forgetting_mlp::datasets::{binary_task1, binary_task2};
use forgetting_mlp::{Bounds, Classifier, LinearBoundary, LinearClassifier};

fn describe(boundary: LinearBoundary) -> String {
    match boundary {
        LinearBoundary::Line { start, end } => format!(
            "line from ({:.2}, {:.2}) to ({:.2}, {:.2})",
            start[0], start[1], end[0], end[1]
        ),
        LinearBoundary::Vertical { x } => format!("vertical line x = {x:.2}"),
        LinearBoundary::Constant => "none (constant prediction)".to_owned(),
    }
}

fn main() -> forgetting_mlp::Result<()> {
    let task1 = binary_task1();
    let task2 = binary_task2();
    let mut model = LinearClassifier::new_with_seed(0.05, 0)?;

    model.train(&task1, 50)?;
    let before = model.evaluate(&task1)?;
    println!("after task 1: boundary {}", describe(model.decision_boundary(Bounds::DEMO, 0)?));
    println!("  task 1 accuracy {:.1}%", before.accuracy * 100.0);

    model.train(&task2, 50)?;
    let after = model.evaluate(&task1)?;
    println!("after task 2: boundary {}", describe(model.decision_boundary(Bounds::DEMO, 0)?));
    println!("  task 2 accuracy {:.1}%", model.evaluate(&task2)?.accuracy * 100.0);
    println!("  task 1 accuracy {:.1}%", after.accuracy * 100.0);

    // One weight vector can only hold one line: learning task 2 rotates it away from task 1.
    let p = model.parameters();
    println!(
        "weights [{:.3}, {:.3}], bias {:.3}",
        p.weights[0], p.weights[1], p.bias
    );
    Ok(())
}
