//! Fixed task datasets.
//!
//! The forgetting experiment trains on two tasks whose samples occupy disjoint
//! regions of the `[0, 8] x [0, 8]` plane. The binary tasks reuse labels 0/1 in
//! both regions; the quadrant tasks split four classes across two tasks.

use crate::{Dataset, Point};

const BINARY_TASK1: [(Point, usize); 8] = [
    ([1.0, 3.0], 0),
    ([2.0, 4.0], 0),
    ([1.5, 2.5], 0),
    ([2.5, 3.5], 0),
    ([6.0, 2.0], 1),
    ([7.0, 3.0], 1),
    ([6.5, 1.5], 1),
    ([7.5, 2.5], 1),
];

const BINARY_TASK2: [(Point, usize); 8] = [
    ([2.0, 1.0], 0),
    ([3.0, 2.0], 0),
    ([2.5, 0.5], 0),
    ([3.5, 1.5], 0),
    ([6.0, 6.0], 1),
    ([7.0, 7.0], 1),
    ([5.5, 6.5], 1),
    ([6.5, 7.5], 1),
];

// Class 0 top-left, class 1 bottom-right.
const QUADRANT_TASK1: [(Point, usize); 16] = [
    ([1.5, 6.5], 0),
    ([2.0, 7.0], 0),
    ([1.0, 6.0], 0),
    ([2.5, 6.5], 0),
    ([1.5, 7.5], 0),
    ([2.0, 6.0], 0),
    ([1.0, 7.0], 0),
    ([2.5, 7.5], 0),
    ([6.0, 1.5], 1),
    ([7.0, 2.0], 1),
    ([6.5, 1.0], 1),
    ([7.5, 2.5], 1),
    ([6.5, 2.5], 1),
    ([7.0, 1.5], 1),
    ([6.0, 2.0], 1),
    ([7.5, 1.5], 1),
];

// Class 2 top-right, class 3 bottom-left.
const QUADRANT_TASK2: [(Point, usize); 16] = [
    ([6.0, 6.5], 2),
    ([7.0, 7.0], 2),
    ([6.5, 6.0], 2),
    ([7.5, 6.5], 2),
    ([6.5, 7.5], 2),
    ([7.0, 6.0], 2),
    ([6.0, 7.0], 2),
    ([7.5, 7.5], 2),
    ([1.5, 1.5], 3),
    ([2.0, 2.0], 3),
    ([1.0, 1.0], 3),
    ([2.5, 2.5], 3),
    ([1.5, 2.5], 3),
    ([2.0, 1.0], 3),
    ([1.0, 2.0], 3),
    ([2.5, 1.5], 3),
];

const CLASS_NAMES: [&str; 4] = ["Red", "Green", "Blue", "Yellow"];

/// First binary task: two clusters along the bottom half of the plane.
pub fn binary_task1() -> Dataset {
    Dataset::from_static(&BINARY_TASK1)
}

/// Second binary task: same labels, moved to a disjoint region.
pub fn binary_task2() -> Dataset {
    Dataset::from_static(&BINARY_TASK2)
}

/// First 4-class task: classes 0 and 1.
pub fn quadrant_task1() -> Dataset {
    Dataset::from_static(&QUADRANT_TASK1)
}

/// Second 4-class task: classes 2 and 3.
pub fn quadrant_task2() -> Dataset {
    Dataset::from_static(&QUADRANT_TASK2)
}

/// Both quadrant tasks together, for joint-training comparisons.
pub fn quadrant_all() -> Dataset {
    quadrant_task1().concat(&quadrant_task2())
}

/// Display name of a 4-class label.
pub fn class_name(class: usize) -> Option<&'static str> {
    CLASS_NAMES.get(class).copied()
}
