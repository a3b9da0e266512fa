//! Labelled 2-D datasets.
//!
//! Every classifier in this crate takes exactly two input features, so a sample is
//! a fixed `[f64; 2]` point plus an integer class label. `Dataset` validates its
//! samples once at construction; training then only needs to check labels against
//! the classifier's class count.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of input features every classifier consumes.
pub const INPUT_DIM: usize = 2;

/// A point in the 2-D feature plane.
pub type Point = [f64; INPUT_DIM];

/// One labelled sample.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub features: Point,
    pub label: usize,
}

impl Sample {
    #[inline]
    pub const fn new(features: Point, label: usize) -> Self {
        Self { features, label }
    }
}

/// An ordered, non-empty collection of samples with finite features.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Build a dataset, rejecting empty input and non-finite features.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        for (i, s) in samples.iter().enumerate() {
            if !s.features.iter().all(|v| v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "sample {i} has non-finite features {:?}",
                    s.features
                )));
            }
        }
        Ok(Self { samples })
    }

    /// Build a dataset from `(point, label)` pairs.
    pub fn from_pairs(pairs: &[(Point, usize)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(features, label)| Sample::new(features, label))
                .collect(),
        )
    }

    /// Build a dataset from per-sample feature rows.
    ///
    /// Every row must have exactly [`INPUT_DIM`] values.
    pub fn from_rows(inputs: &[Vec<f64>], labels: &[usize]) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(Error::InvalidData(format!(
                "inputs/labels length mismatch: {} vs {}",
                inputs.len(),
                labels.len()
            )));
        }

        let mut samples = Vec::with_capacity(inputs.len());
        for (i, (row, &label)) in inputs.iter().zip(labels).enumerate() {
            let features: Point = row.as_slice().try_into().map_err(|_| {
                Error::InvalidShape(format!(
                    "input row {i} has len {}, expected {INPUT_DIM}",
                    row.len()
                ))
            })?;
            samples.push(Sample::new(features, label));
        }
        Self::new(samples)
    }

    /// Literal datasets compiled into the crate; they are non-empty and finite.
    pub(crate) fn from_static(pairs: &[(Point, usize)]) -> Self {
        debug_assert!(!pairs.is_empty());
        Self {
            samples: pairs
                .iter()
                .map(|&(features, label)| Sample::new(features, label))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a dataset built through [`Dataset::new`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Sorted, de-duplicated labels present in the dataset.
    pub fn classes(&self) -> Vec<usize> {
        let mut classes: Vec<usize> = self.samples.iter().map(|s| s.label).collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Samples with the given label, or `None` if there are none.
    pub fn class_subset(&self, label: usize) -> Option<Dataset> {
        let samples: Vec<Sample> = self
            .samples
            .iter()
            .filter(|s| s.label == label)
            .copied()
            .collect();
        if samples.is_empty() {
            None
        } else {
            Some(Self { samples })
        }
    }

    /// Concatenation of `self` followed by `other`.
    pub fn concat(&self, other: &Dataset) -> Dataset {
        let mut samples = Vec::with_capacity(self.len() + other.len());
        samples.extend_from_slice(&self.samples);
        samples.extend_from_slice(&other.samples);
        Self { samples }
    }

    /// Reject labels outside `0..num_classes`.
    pub fn check_labels(&self, num_classes: usize) -> Result<()> {
        if let Some((i, s)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.label >= num_classes)
        {
            return Err(Error::InvalidData(format!(
                "sample {i} has label {}, expected < {num_classes}",
                s.label
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_non_finite_datasets() {
        assert!(matches!(Dataset::new(vec![]), Err(Error::InvalidData(_))));

        let nan = Dataset::from_pairs(&[([f64::NAN, 1.0], 0)]);
        assert!(matches!(nan, Err(Error::InvalidData(_))));
    }

    #[test]
    fn from_rows_validates_feature_count() {
        let ok = Dataset::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]], &[0, 1]);
        assert_eq!(ok.unwrap().len(), 2);

        let err = Dataset::from_rows(&[vec![1.0, 2.0, 3.0]], &[0]);
        assert!(matches!(err, Err(Error::InvalidShape(_))));

        let err = Dataset::from_rows(&[vec![1.0, 2.0]], &[0, 1]);
        assert!(matches!(err, Err(Error::InvalidData(_))));
    }

    #[test]
    fn check_labels_reports_first_out_of_range_sample() {
        let data = Dataset::from_pairs(&[([0.0, 0.0], 0), ([1.0, 1.0], 3)]).unwrap();
        assert!(data.check_labels(4).is_ok());
        let err = data.check_labels(2).unwrap_err();
        assert!(err.to_string().contains("sample 1"));
    }

    #[test]
    fn class_helpers() {
        let data =
            Dataset::from_pairs(&[([0.0, 0.0], 2), ([1.0, 1.0], 0), ([2.0, 2.0], 2)]).unwrap();
        assert_eq!(data.classes(), vec![0, 2]);
        assert_eq!(data.class_subset(2).unwrap().len(), 2);
        assert!(data.class_subset(1).is_none());
        assert_eq!(data.concat(&data).len(), 6);
    }
}
