//! Mutual information between discrete state codes.
//!
//! Each variable (a feature column of the working view, or the class label) is
//! turned into integer state codes: feature values are rounded to the nearest
//! integer, labels are used as-is. Codes are rebased onto `[min, max]`, so the
//! number of states is `max - min + 1` even when some integers in between are
//! never observed. Mutual information is then read off the empirical joint
//! probability table, in bits.
//!
//! Raw views can span most of the `i64` range, so the joint table only holds
//! the cells actually observed. Unobserved cells have zero probability and
//! never contribute to the marginals or to the sum.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::error::MrmrError;
use crate::preprocessing::WorkingView;

/// One operand of a mutual information query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Column `i` of the working view.
    Feature(usize),
    /// The class label of every sample.
    ClassLabel,
}

/// Zero-based state index of every sample for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCodes {
    codes: Vec<u64>,
    /// `max - min + 1`; up to 2^64 for a fully spread raw column.
    n_states: u128,
}

impl StateCodes {
    /// Rebase integer values onto `0..=(max - min)`.
    pub fn from_integers(values: &[i64]) -> Self {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return StateCodes {
                codes: Vec::new(),
                n_states: 0,
            };
        };
        // The offset from `min` always fits in u64, even when `max - min`
        // overflows i64.
        let codes = values
            .iter()
            .map(|&v| (i128::from(v) - i128::from(min)) as u64)
            .collect();
        StateCodes {
            codes,
            n_states: (i128::from(max) - i128::from(min)) as u128 + 1,
        }
    }

    /// Round every value to the nearest integer (halves away from zero).
    ///
    /// Values beyond the `i64` range saturate; NaN becomes 0.
    pub fn from_continuous<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let rounded: Vec<i64> = values.into_iter().map(|v| v.round() as i64).collect();
        Self::from_integers(&rounded)
    }

    pub fn from_labels(labels: &[i32]) -> Self {
        let values: Vec<i64> = labels.iter().map(|&l| i64::from(l)).collect();
        Self::from_integers(&values)
    }

    pub fn codes(&self) -> &[u64] {
        &self.codes
    }

    pub fn n_states(&self) -> u128 {
        self.n_states
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Mutual information, in bits, between two variables observed on the same samples.
///
/// Only cells whose joint and both marginal probabilities are non-zero
/// contribute to the sum. Cells are visited in row-major order, and each
/// marginal accumulates its cells in ascending order of the other index.
pub fn mutual_info_from_codes(a: &StateCodes, b: &StateCodes) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "Mutual information requires both variables on the same samples"
    );
    let n_samples = a.len();
    if n_samples == 0 {
        return 0.0;
    }

    let mut joint: BTreeMap<(u64, u64), f64> = BTreeMap::new();
    for (&i, &j) in a.codes.iter().zip(b.codes.iter()) {
        *joint.entry((i, j)).or_insert(0.0) += 1.0;
    }
    let n = n_samples as f64;
    for cell in joint.values_mut() {
        *cell /= n;
    }

    let mut p_a: BTreeMap<u64, f64> = BTreeMap::new();
    let mut p_b: BTreeMap<u64, f64> = BTreeMap::new();
    for (&(i, j), &p) in &joint {
        *p_a.entry(i).or_insert(0.0) += p;
        *p_b.entry(j).or_insert(0.0) += p;
    }

    let mut mi = 0.0;
    for (&(i, j), &p) in &joint {
        let (pa, pb) = (p_a[&i], p_b[&j]);
        if p != 0.0 && pa != 0.0 && pb != 0.0 {
            mi += p * (p / pa / pb).ln();
        }
    }
    mi / 2.0f64.ln()
}

/// Answers mutual information queries over one working view and its labels.
///
/// State codes for every feature and for the class label are built once on
/// construction; queries only fill the joint table.
pub struct MutualInfoEstimator {
    features: Vec<StateCodes>,
    class_label: StateCodes,
}

impl MutualInfoEstimator {
    pub fn new(view: &WorkingView, labels: &[i32]) -> Self {
        assert_eq!(
            view.n_samples(),
            labels.len(),
            "Working view and labels must cover the same samples"
        );
        let values = view.values();
        let features = (0..view.n_features())
            .into_par_iter()
            .map(|j| StateCodes::from_continuous(values.column(j).iter()))
            .collect();
        MutualInfoEstimator {
            features,
            class_label: StateCodes::from_labels(labels),
        }
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_samples(&self) -> usize {
        self.class_label.len()
    }

    pub(crate) fn feature_codes(&self) -> &[StateCodes] {
        &self.features
    }

    pub(crate) fn label_codes(&self) -> &StateCodes {
        &self.class_label
    }

    /// State codes of a variable, or an error for an out-of-range feature.
    pub fn state_codes(&self, variable: Variable) -> Result<&StateCodes, MrmrError> {
        match variable {
            Variable::ClassLabel => Ok(&self.class_label),
            Variable::Feature(index) => {
                self.features
                    .get(index)
                    .ok_or(MrmrError::FeatureOutOfRange {
                        index,
                        n_features: self.features.len(),
                    })
            }
        }
    }

    /// Mutual information between `a` and `b`, in bits.
    pub fn mutual_info(&self, a: Variable, b: Variable) -> Result<f64, MrmrError> {
        let a = self.state_codes(a)?;
        let b = self.state_codes(b)?;
        Ok(mutual_info_from_codes(a, b))
    }

    /// Entropy of a single variable, in bits.
    pub fn entropy(&self, variable: Variable) -> Result<f64, MrmrError> {
        self.mutual_info(variable, variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Dataset;
    use crate::preprocessing::{working_view, Discretization};

    fn estimator(samples: &[Vec<f64>], labels: &[i32]) -> MutualInfoEstimator {
        let dataset = Dataset::from_samples(samples, labels).unwrap();
        let view = working_view(&dataset, Discretization::Raw);
        MutualInfoEstimator::new(&view, dataset.labels())
    }

    #[test]
    fn state_count_spans_unobserved_integers() {
        let codes = StateCodes::from_integers(&[-2, 3, 0]);
        assert_eq!(codes.n_states(), 6);
        assert_eq!(codes.codes(), &[0, 5, 2]);
    }

    #[test]
    fn continuous_values_are_rounded() {
        let values = [0.4, 0.5, -0.5, 1.49, -1.6];
        let codes = StateCodes::from_continuous(values.iter());
        // rounded: 0, 1, -1, 1, -2
        assert_eq!(codes.codes(), &[2, 3, 1, 3, 0]);
        assert_eq!(codes.n_states(), 4);
    }

    #[test]
    fn full_i64_span_does_not_overflow() {
        let codes = StateCodes::from_integers(&[i64::MIN, 0, i64::MAX]);
        assert_eq!(codes.codes(), &[0, 1 << 63, u64::MAX]);
        assert_eq!(codes.n_states(), 1u128 << 64);

        let other = StateCodes::from_integers(&[1, 0, 1]);
        let mi = mutual_info_from_codes(&codes, &other);
        let entropy = mutual_info_from_codes(&other, &other);
        assert!((mi - entropy).abs() < 1e-12);
    }

    #[test]
    fn extreme_raw_values_are_estimated() {
        let est = estimator(&[vec![5e18, 1.0], vec![-5e18, 0.0], vec![5e18, 1.0]], &[0, 1, 0]);
        let wide = est.mutual_info(Variable::Feature(0), Variable::ClassLabel).unwrap();
        let narrow = est.mutual_info(Variable::Feature(1), Variable::ClassLabel).unwrap();
        assert!(wide > 0.9);
        assert_eq!(wide, narrow);
        let saturated = StateCodes::from_continuous([f64::MAX, f64::MIN, f64::NAN].iter());
        assert_eq!(saturated.codes(), &[u64::MAX, 0, 1 << 63]);
    }

    #[test]
    fn identical_binary_variables_share_one_bit() {
        let a = StateCodes::from_integers(&[0, 1, 0, 1]);
        let mi = mutual_info_from_codes(&a, &a);
        assert!((mi - 1.0).abs() < 1e-12, "mi = {}", mi);
    }

    #[test]
    fn independent_variables_have_zero_information() {
        let a = StateCodes::from_integers(&[0, 0, 1, 1]);
        let b = StateCodes::from_integers(&[0, 1, 0, 1]);
        assert!(mutual_info_from_codes(&a, &b).abs() < 1e-12);
    }

    #[test]
    fn empty_codes_have_zero_information() {
        let a = StateCodes::from_integers(&[]);
        assert_eq!(a.n_states(), 0);
        assert_eq!(mutual_info_from_codes(&a, &a), 0.0);
    }

    #[test]
    fn out_of_range_feature_is_rejected() {
        let est = estimator(&[vec![0.0, 1.0], vec![1.0, 0.0]], &[0, 1]);
        let err = est
            .mutual_info(Variable::Feature(2), Variable::ClassLabel)
            .unwrap_err();
        assert_eq!(err, MrmrError::FeatureOutOfRange { index: 2, n_features: 2 });
        assert!(est.mutual_info(Variable::ClassLabel, Variable::Feature(7)).is_err());
    }

    #[test]
    fn feature_matching_labels_carries_label_entropy() {
        let est = estimator(
            &[vec![0.0, 3.0], vec![1.0, 3.0], vec![0.0, 3.0], vec![1.0, 3.0]],
            &[-1, 1, -1, 1],
        );
        let relevance = est.mutual_info(Variable::Feature(0), Variable::ClassLabel).unwrap();
        let entropy = est.entropy(Variable::ClassLabel).unwrap();
        assert!((relevance - 1.0).abs() < 1e-12);
        assert!((entropy - 1.0).abs() < 1e-12);
        // Constant feature tells nothing about the label.
        let constant = est.mutual_info(Variable::Feature(1), Variable::ClassLabel).unwrap();
        assert_eq!(constant, 0.0);
    }

    #[test]
    fn information_is_non_negative_symmetric_and_bounded_by_entropy() {
        let samples = vec![
            vec![0.0, 2.0, 1.0],
            vec![1.0, 2.0, -1.0],
            vec![2.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![2.0, 2.0, -1.0],
            vec![2.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ];
        let labels = vec![0, 1, 2, 0, 1, 2, 2, 0];
        let est = estimator(&samples, &labels);

        let variables = [
            Variable::Feature(0),
            Variable::Feature(1),
            Variable::Feature(2),
            Variable::ClassLabel,
        ];
        for &a in &variables {
            let self_info = est.entropy(a).unwrap();
            for &b in &variables {
                let ab = est.mutual_info(a, b).unwrap();
                let ba = est.mutual_info(b, a).unwrap();
                assert!(ab >= -1e-12, "I({:?}, {:?}) = {}", a, b, ab);
                assert!((ab - ba).abs() < 1e-12);
                assert!(self_info + 1e-12 >= ab, "H({:?}) < I({:?}, {:?})", a, a, b);
            }
        }
    }
}
