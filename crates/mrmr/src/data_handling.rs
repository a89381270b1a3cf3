//! Sample storage for feature selection.
//!
//! This module defines `Dataset`, the caller-owned table of feature vectors and
//! integer class labels, together with the per-class grouping of sample
//! indices. The dataset only changes through explicit insert or reset calls;
//! every selection request derives its own working view from it.
use std::collections::BTreeMap;
use std::fmt;

use ndarray::ArrayView2;

use crate::error::MrmrError;
use crate::feature_selection::mrmr::{MrmrMethod, MrmrSelector, SelectionStep};
use crate::feature_selection::mutual_info::MutualInfoEstimator;
use crate::preprocessing::{working_view, Discretization};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    n_features: usize,
    /// Row-major sample values, `n_samples * n_features` long.
    values: Vec<f64>,
    /// Class label of each sample, in insertion order.
    labels: Vec<i32>,
    /// Class label -> sample indices bearing it, in insertion order.
    classes: BTreeMap<i32, Vec<usize>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from parallel slices of samples and labels.
    pub fn from_samples(samples: &[Vec<f64>], labels: &[i32]) -> Result<Self, MrmrError> {
        let mut dataset = Dataset::new();
        dataset.add_datas(samples, labels)?;
        Ok(dataset)
    }

    /// Clear every sample, label and class group.
    pub fn reset(&mut self) {
        self.n_features = 0;
        self.values.clear();
        self.labels.clear();
        self.classes.clear();
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Class label -> indices of the samples bearing it, ordered by label.
    pub fn classes(&self) -> &BTreeMap<i32, Vec<usize>> {
        &self.classes
    }

    /// The raw value matrix, shape `(n_samples, n_features)`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        ArrayView2::from_shape((self.n_samples(), self.n_features), &self.values)
            .expect("values buffer always holds n_samples * n_features entries")
    }

    pub fn sample(&self, index: usize) -> Option<&[f64]> {
        if index >= self.n_samples() {
            return None;
        }
        let start = index * self.n_features;
        Some(&self.values[start..start + self.n_features])
    }

    /// Append one sample.
    ///
    /// The first sample fixes the feature count; later samples must match it.
    /// On failure the dataset is left untouched.
    pub fn add_sample(&mut self, sample: &[f64], class_id: i32) -> Result<(), MrmrError> {
        if self.is_empty() {
            self.n_features = sample.len();
        } else if sample.len() != self.n_features {
            log::warn!(
                "Rejected sample: {} features where previous samples have {}",
                sample.len(),
                self.n_features
            );
            return Err(MrmrError::FeatureCountMismatch {
                expected: self.n_features,
                found: sample.len(),
            });
        }

        let index = self.labels.len();
        self.values.extend_from_slice(sample);
        self.labels.push(class_id);
        self.classes.entry(class_id).or_default().push(index);
        Ok(())
    }

    /// Append a batch of samples.
    ///
    /// Fails up front when `samples` and `class_ids` differ in length. Otherwise
    /// samples are inserted in order and the first rejected one stops the
    /// batch; samples accepted before it stay in the dataset.
    pub fn add_datas(&mut self, samples: &[Vec<f64>], class_ids: &[i32]) -> Result<(), MrmrError> {
        if samples.len() != class_ids.len() {
            log::warn!(
                "Rejected batch: {} samples but {} class labels",
                samples.len(),
                class_ids.len()
            );
            return Err(MrmrError::LengthMismatch {
                samples: samples.len(),
                labels: class_ids.len(),
            });
        }
        for (sample, &class_id) in samples.iter().zip(class_ids) {
            self.add_sample(sample, class_id)?;
        }
        Ok(())
    }

    /// Reset the dataset, then append the batch (see [`Dataset::add_datas`]).
    pub fn set_datas(&mut self, samples: &[Vec<f64>], class_ids: &[i32]) -> Result<(), MrmrError> {
        self.reset();
        self.add_datas(samples, class_ids)
    }

    /// Run mRMR selection on the current samples.
    ///
    /// A fresh working view is derived for this call only, so repeated calls
    /// with different discretizations never see each other's normalization.
    pub fn process(
        &self,
        discretization: Discretization,
        n_features: usize,
        method: MrmrMethod,
    ) -> Vec<usize> {
        self.process_with_scores(discretization, n_features, method)
            .into_iter()
            .map(|step| step.feature)
            .collect()
    }

    /// Same as [`Dataset::process`], keeping relevance, redundancy and score per step.
    pub fn process_with_scores(
        &self,
        discretization: Discretization,
        n_features: usize,
        method: MrmrMethod,
    ) -> Vec<SelectionStep> {
        if n_features == 0 {
            return Vec::new();
        }
        let view = working_view(self, discretization);
        log::debug!("{}", self.summary().trim_end());
        log::debug!("{}", view.describe());

        let estimator = MutualInfoEstimator::new(&view, &self.labels);
        MrmrSelector::new(n_features, method).select_with_scores(&estimator)
    }

    /// Human readable counts of features, samples and classes.
    pub fn summary(&self) -> String {
        let classes = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, (class_id, members))| {
                format!("Class {} : id({}), {} samples", i, class_id, members.len())
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Datas contain {} Features, with {} samples, for {} Classes ({}).\n",
            self.n_features,
            self.n_samples(),
            self.n_classes(),
            classes
        )
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
