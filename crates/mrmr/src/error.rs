use std::error::Error;
use std::fmt;

/// Errors raised by the dataset manager and the mutual information estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MrmrError {
    /// A sample's value count disagrees with the dataset's feature count.
    FeatureCountMismatch { expected: usize, found: usize },
    /// Bulk insert was given a different number of samples and labels.
    LengthMismatch { samples: usize, labels: usize },
    /// A feature index outside `[0, n_features)` was requested.
    FeatureOutOfRange { index: usize, n_features: usize },
}

impl fmt::Display for MrmrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MrmrError::FeatureCountMismatch { expected, found } => write!(
                f,
                "Sample has {} features but previous samples have {}",
                found, expected
            ),
            MrmrError::LengthMismatch { samples, labels } => write!(
                f,
                "Number of samples ({}) and class labels ({}) differ",
                samples, labels
            ),
            MrmrError::FeatureOutOfRange { index, n_features } => write!(
                f,
                "Feature index {} is out of range for {} features",
                index, n_features
            ),
        }
    }
}

impl Error for MrmrError {}
