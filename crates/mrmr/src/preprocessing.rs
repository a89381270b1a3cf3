//! Normalization and discretization of the sample matrix.
//!
//! Every selection request builds a `WorkingView` from the dataset: either the
//! raw values, or the per-feature z-scores mapped onto the ternary alphabet
//! `{-1, 0, 1}` with a symmetric threshold.

use ndarray::{Array2, ArrayView2, Axis};

use crate::data_handling::Dataset;

/// How the working view is derived from the raw values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discretization {
    /// Keep the raw values; the estimator rounds them to integer states.
    Raw,
    /// z-score every feature, then map values to `{-1, 0, 1}`.
    Ternary { threshold: f64 },
}

impl Discretization {
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Discretization::Raw => None,
            Discretization::Ternary { threshold } => Some(*threshold),
        }
    }

    /// One-line normalization state, as reported next to the dataset summary.
    pub fn describe(&self) -> String {
        match self {
            Discretization::Raw => "Datas are not z-scored and discretized.".to_string(),
            Discretization::Ternary { threshold } => format!(
                "Datas are z-scored and discretized (threshold {}).",
                threshold
            ),
        }
    }
}

/// `f64::INFINITY` means no discretization; any other value is a threshold.
impl From<f64> for Discretization {
    fn from(threshold: f64) -> Self {
        if threshold == f64::INFINITY {
            Discretization::Raw
        } else {
            Discretization::Ternary { threshold }
        }
    }
}

impl From<Option<f64>> for Discretization {
    fn from(threshold: Option<f64>) -> Self {
        threshold.map_or(Discretization::Raw, Discretization::from)
    }
}

/// Per-request numeric view of the dataset, shaped `(n_samples, n_features)`.
#[derive(Debug, Clone)]
pub struct WorkingView {
    values: Array2<f64>,
    discretization: Discretization,
}

impl WorkingView {
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn describe(&self) -> String {
        self.discretization.describe()
    }
}

/// Build the working view for one selection request.
pub fn working_view(dataset: &Dataset, discretization: Discretization) -> WorkingView {
    let mut values = dataset.values().to_owned();
    if let Discretization::Ternary { threshold } = discretization {
        values = z_score(values.view());
        discretize(&mut values, threshold);
    }
    WorkingView {
        values,
        discretization,
    }
}

/// Standardize every column to zero mean and unit (unbiased) standard deviation.
///
/// With a single sample every value becomes 0. A constant column over several
/// samples divides by zero and yields non-finite values, which the
/// discretization step later maps to state 0.
pub fn z_score(x: ArrayView2<f64>) -> Array2<f64> {
    let n_samples = x.nrows();
    let mut out = Array2::zeros(x.raw_dim());
    if n_samples == 1 {
        return out;
    }

    for (column, mut target) in x.axis_iter(Axis(1)).zip(out.axis_iter_mut(Axis(1))) {
        let mut sum = 0.0;
        for &v in column.iter() {
            sum += v;
        }
        let mean = sum / n_samples as f64;

        let mut squares = 0.0;
        for &v in column.iter() {
            let d = v - mean;
            squares += d * d;
        }
        let std = (squares / (n_samples - 1) as f64).sqrt();

        for (t, &v) in target.iter_mut().zip(column.iter()) {
            *t = (v - mean) / std;
        }
    }
    out
}

/// Map values above `threshold` to 1, below `-threshold` to -1, the rest to 0.
pub fn discretize(x: &mut Array2<f64>, threshold: f64) {
    x.mapv_inplace(|v| {
        if v > threshold {
            1.0
        } else if v < -threshold {
            -1.0
        } else {
            0.0
        }
    });
}
