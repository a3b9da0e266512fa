use forgetting_mlp::datasets::{binary_task1, quadrant_task1, quadrant_task2};
use forgetting_mlp::{
    Bounds, Classifier, Dataset, Error, LinearBoundary, LinearClassifier, LinearParameters,
    MlpClassifier, MlpParameters, MulticlassMlp, SNAPSHOT_INTERVAL, sample_points,
};

fn assert_history_shape<C: Classifier>(model: &C) {
    let h = model.history();
    assert_eq!(h.losses().len(), h.epoch());
    assert_eq!(h.accuracies().len(), h.epoch());
    assert_eq!(h.snapshots().len(), 1 + h.epoch() / SNAPSHOT_INTERVAL);
    for (i, s) in h.snapshots().iter().enumerate() {
        assert_eq!(s.epoch, i * SNAPSHOT_INTERVAL);
    }
    assert!(h.accuracies().iter().all(|a| (0.0..=1.0).contains(a)));
}

fn check_counters<C: Classifier>(mut model: C, data: &Dataset) {
    assert_eq!(model.history().epoch(), 0);
    assert_history_shape(&model);

    for expected in 1..=12 {
        model.train_step(data).unwrap();
        assert_eq!(model.history().epoch(), expected);
        assert_history_shape(&model);
    }

    let metrics = model.metrics();
    assert_eq!(metrics.epoch, 12);
    assert_eq!(metrics.loss, *model.history().losses().last().unwrap());
    assert_eq!(metrics.snapshots.len(), 3);

    model.reset();
    assert_eq!(model.history().epoch(), 0);
    assert_history_shape(&model);
    assert_eq!(model.metrics().loss, 0.0);
    assert_eq!(model.metrics().accuracy, 0.0);
}

#[test]
fn history_shape_holds_for_every_variant() {
    check_counters(LinearClassifier::new_with_seed(0.05, 1).unwrap(), &binary_task1());
    check_counters(MlpClassifier::new_with_seed(0.1, 4, 1).unwrap(), &binary_task1());
    check_counters(MulticlassMlp::new_with_seed(0.1, 8, 1).unwrap(), &quadrant_task1());
}

#[test]
fn snapshots_are_deep_copies() {
    let mut model = MlpClassifier::new_with_seed(0.1, 4, 5).unwrap();
    let initial = model.parameters();
    model.train(&binary_task1(), 10).unwrap();

    let snaps = model.history().snapshots();
    assert_eq!(snaps[0].parameters, initial);
    assert_ne!(snaps[1].parameters, initial);
    assert_eq!(snaps[2].parameters, model.parameters());
}

#[test]
fn binary_predictions_are_probabilities() {
    let linear = LinearClassifier::new_with_seed(0.05, 2).unwrap();
    let mlp = MlpClassifier::new_with_seed(0.1, 4, 2).unwrap();
    for x in sample_points(Bounds::new(-100.0, 100.0, -100.0, 100.0).unwrap(), 20).unwrap() {
        assert!((0.0..=1.0).contains(&linear.predict(x)));
        assert!((0.0..=1.0).contains(&mlp.predict(x)));
    }
}

const EXTREME_POINTS: [[f64; 2]; 4] = [
    [f64::MAX, -f64::MAX],
    [-f64::MAX, f64::MAX],
    [f64::MAX, f64::MAX],
    [-f64::MAX, -f64::MAX],
];

#[test]
fn extreme_inputs_with_large_weights_stay_probabilities() {
    let linear = LinearClassifier::from_parameters(
        0.1,
        LinearParameters {
            weights: [2.0, 2.0],
            bias: 0.0,
        },
        0,
    )
    .unwrap();
    let mlp = MlpClassifier::from_parameters(
        0.1,
        &MlpParameters {
            weights1: vec![vec![2.0, -3.0], vec![2.0, 3.0]],
            bias1: vec![0.0, 0.0],
            weights2: vec![vec![f64::MAX], vec![f64::MAX]],
            bias2: vec![0.0],
        },
        0,
    )
    .unwrap();
    let multiclass = MulticlassMlp::from_parameters(
        0.1,
        &MlpParameters {
            weights1: vec![vec![2.0, -3.0], vec![2.0, 3.0]],
            bias1: vec![0.0, 0.0],
            weights2: vec![vec![f64::MAX, -f64::MAX, 0.0, 1.0]; 2],
            bias2: vec![0.0; 4],
        },
        0,
    )
    .unwrap();

    for x in EXTREME_POINTS {
        let p = linear.predict(x);
        assert!((0.0..=1.0).contains(&p), "linear p={p} at {x:?}");
        let p = mlp.predict(x);
        assert!((0.0..=1.0).contains(&p), "mlp p={p} at {x:?}");

        let probs = multiclass.predict(x);
        let sum: f64 = probs.iter().sum();
        assert!(probs.iter().all(|v| (0.0..=1.0).contains(v)), "{probs:?} at {x:?}");
        assert!((sum - 1.0).abs() < 1e-9, "sum={sum} at {x:?}");
    }
    assert_eq!(linear.predict([f64::MAX, -f64::MAX]), 0.5);
    assert_eq!(linear.predict_class([f64::MAX, -f64::MAX]), 1);
}

#[test]
fn multiclass_predictions_sum_to_one() {
    let mut model = MulticlassMlp::new_with_seed(0.15, 8, 2).unwrap();
    model.train(&quadrant_task1(), 30).unwrap();
    for x in sample_points(Bounds::new(-50.0, 50.0, -50.0, 50.0).unwrap(), 25).unwrap() {
        let p = model.predict(x);
        let sum: f64 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum={sum} at {x:?}");
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn predict_is_pure_given_parameters() {
    let mut model = MulticlassMlp::new_with_seed(0.1, 8, 3).unwrap();
    model.train(&quadrant_task1(), 7).unwrap();
    let x = [2.5, 6.5];
    assert_eq!(model.predict(x), model.predict(x));
    assert_eq!(model.predict_class(x), model.predict_class(x));
    let copy = MulticlassMlp::from_parameters(0.1, &model.parameters(), 0).unwrap();
    assert_eq!(copy.predict(x), model.predict(x));
}

#[test]
fn same_seed_same_trajectory() {
    let data = binary_task1();
    let mut a = MlpClassifier::new_with_seed(0.1, 4, 99).unwrap();
    let mut b = MlpClassifier::new_with_seed(0.1, 4, 99).unwrap();
    a.train(&data, 20).unwrap();
    b.train(&data, 20).unwrap();
    assert_eq!(a.history(), b.history());

    a.reset();
    b.reset();
    assert_eq!(a.parameters(), b.parameters());
}

#[test]
fn demo_grid_matches_resolution_rule() {
    let step: f64 = 8.0 / 50.0;
    let expected = ((8.0 / step).floor() as usize + 1).pow(2);
    assert_eq!(expected, 2601);

    let mlp = MlpClassifier::new_with_seed(0.1, 4, 0).unwrap();
    let grid = mlp.decision_boundary(Bounds::DEMO, 50).unwrap();
    assert_eq!(grid.len(), expected);
    assert!(grid.iter().all(|g| (0.0..=8.0).contains(&g.x) && (0.0..=8.0).contains(&g.y)));
    assert!(grid.iter().all(|g| (0.0..=1.0).contains(&g.prediction)));

    let mc = MulticlassMlp::new_with_seed(0.1, 8, 0).unwrap();
    let grid = mc.decision_boundary(Bounds::DEMO, 50).unwrap();
    assert_eq!(grid.len(), expected);
    assert!(grid.iter().all(|g| g.class < 4));
}

#[test]
fn linear_boundary_lies_on_the_decision_line() {
    let mut model = LinearClassifier::new_with_seed(0.05, 4).unwrap();
    model.train(&binary_task1(), 50).unwrap();
    match model.decision_boundary(Bounds::DEMO, 50).unwrap() {
        LinearBoundary::Line { start, end } => {
            for p in [start, end] {
                assert!((model.predict(p) - 0.5).abs() < 1e-9);
            }
        }
        LinearBoundary::Vertical { x } => {
            assert!((model.predict([x, 4.0]) - 0.5).abs() < 1e-9);
        }
        LinearBoundary::Constant => panic!("trained weights should not vanish"),
    }
}

#[test]
fn weight_magnitudes_match_parameters() {
    let mc = MulticlassMlp::new_with_seed(0.1, 8, 8).unwrap();
    let p = mc.parameters();
    let norm = |m: &[Vec<f64>]| m.iter().flatten().map(|w| w * w).sum::<f64>().sqrt();
    let mags = mc.weight_magnitudes();
    assert!((mags.hidden - norm(&p.weights1)).abs() < 1e-12);
    assert!((mags.output - norm(&p.weights2)).abs() < 1e-12);
}

#[test]
fn invalid_inputs_are_rejected() {
    let mut mlp = MlpClassifier::new_with_seed(0.1, 4, 0).unwrap();
    assert!(matches!(mlp.train(&binary_task1(), 0), Err(Error::InvalidConfig(_))));
    assert!(matches!(
        mlp.decision_boundary(Bounds::DEMO, 0),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        mlp.train_step(&quadrant_task2()),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        Dataset::from_rows(&[vec![1.0, 2.0, 3.0]], &[0]),
        Err(Error::InvalidShape(_))
    ));
    assert!(matches!(Dataset::new(Vec::new()), Err(Error::InvalidData(_))));
    assert_eq!(mlp.history().epoch(), 0);
}

#[test]
fn train_callback_sees_every_epoch() {
    let mut model = LinearClassifier::new_with_seed(0.05, 0).unwrap();
    let mut seen = Vec::new();
    let last = model
        .train_with(&binary_task1(), 6, |m, i| seen.push((i, m.loss)))
        .unwrap();
    let indices: Vec<usize> = seen.iter().map(|&(i, _)| i).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    let losses: Vec<f64> = seen.iter().map(|&(_, l)| l).collect();
    assert_eq!(losses, model.history().losses());
    assert_eq!(last.loss, losses[5]);
}
