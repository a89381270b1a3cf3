//! Greedy minimum-Redundancy-Maximum-Relevance selection.
//!
//! See: Peng, Long & Ding, "Feature selection based on mutual information:
//! criteria of max-dependency, max-relevance, and min-redundancy",
//! IEEE TPAMI 27(8), 2005.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::mutual_info::{mutual_info_from_codes, MutualInfoEstimator};

/// Added to the redundancy in the MIQ quotient so it never divides by zero.
pub const MIQ_EPSILON: f64 = 1e-4;

/// How relevance and redundancy are combined into a candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MrmrMethod {
    /// Mutual information difference: `relevance - redundancy`.
    #[default]
    Mid,
    /// Mutual information quotient: `relevance / (redundancy + 1e-4)`.
    Miq,
}

impl MrmrMethod {
    pub fn score(&self, relevance: f64, redundancy: f64) -> f64 {
        match self {
            MrmrMethod::Mid => relevance - redundancy,
            MrmrMethod::Miq => relevance / (redundancy + MIQ_EPSILON),
        }
    }
}

impl FromStr for MrmrMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mid" => Ok(MrmrMethod::Mid),
            "miq" => Ok(MrmrMethod::Miq),
            _ => Err(format!("Unknown mRMR method: {}. Expected 'mid' or 'miq'", s)),
        }
    }
}

impl fmt::Display for MrmrMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MrmrMethod::Mid => write!(f, "MID"),
            MrmrMethod::Miq => write!(f, "MIQ"),
        }
    }
}

/// One greedy step: the feature taken and the numbers that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionStep {
    pub feature: usize,
    pub relevance: f64,
    /// Mean mutual information with the features selected before this one.
    pub redundancy: f64,
    pub score: f64,
}

/// Selects up to `n_features` features in greedy mRMR order.
#[derive(Debug, Clone, Copy)]
pub struct MrmrSelector {
    n_features: usize,
    method: MrmrMethod,
}

impl MrmrSelector {
    pub fn new(n_features: usize, method: MrmrMethod) -> Self {
        MrmrSelector { n_features, method }
    }

    /// Selected feature indices, in selection order.
    pub fn select(&self, estimator: &MutualInfoEstimator) -> Vec<usize> {
        self.select_with_scores(estimator)
            .into_iter()
            .map(|step| step.feature)
            .collect()
    }

    /// Run the greedy selection and keep the score of every step.
    ///
    /// 1. Relevance of each feature is its mutual information with the class label.
    /// 2. Features are ordered once by relevance, descending, with a stable sort so
    ///    ties keep ascending index order. The first one is selected.
    /// 3. Each later step walks that fixed order over the unselected features and
    ///    takes the first one reaching the highest score; an equal score later in
    ///    the walk does not replace it.
    ///
    /// Asking for more features than exist selects all of them.
    pub fn select_with_scores(&self, estimator: &MutualInfoEstimator) -> Vec<SelectionStep> {
        let n_total = estimator.n_features();
        let n = self.n_features.min(n_total);
        if n == 0 {
            return Vec::new();
        }

        let features = estimator.feature_codes();
        let class_label = estimator.label_codes();

        let relevance: Vec<f64> = features
            .par_iter()
            .map(|codes| mutual_info_from_codes(class_label, codes))
            .collect();

        let mut order: Vec<usize> = (0..n_total).collect();
        // `sort_by` is stable: equal relevance keeps ascending feature index.
        order.sort_by(|&a, &b| {
            relevance[b]
                .partial_cmp(&relevance[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::debug!(
            "mRMR ({}): selecting {} of {} features, class entropy {:.6} bits",
            self.method,
            n,
            n_total,
            mutual_info_from_codes(class_label, class_label)
        );

        let mut selected = Vec::with_capacity(n);
        let mut consumed = vec![false; n_total];
        // Running sum of I(selected_j; candidate) over the selection so far,
        // accumulated in selection order.
        let mut redundancy_sum = vec![0.0f64; n_total];

        let first = order[0];
        consumed[first] = true;
        selected.push(SelectionStep {
            feature: first,
            relevance: relevance[first],
            redundancy: 0.0,
            score: relevance[first],
        });
        log::debug!(
            "mRMR step 0: feature {} (relevance {:.6})",
            first,
            relevance[first]
        );

        for step in 1..n {
            let last = &features[selected[step - 1].feature];
            let candidates: Vec<usize> = order.iter().copied().filter(|&id| !consumed[id]).collect();

            let added: Vec<f64> = candidates
                .par_iter()
                .map(|&id| mutual_info_from_codes(last, &features[id]))
                .collect();
            for (&id, mi) in candidates.iter().zip(added) {
                redundancy_sum[id] += mi;
            }

            let mut best: Option<SelectionStep> = None;
            for &id in &candidates {
                let redundancy = redundancy_sum[id] / step as f64;
                let score = self.method.score(relevance[id], redundancy);
                let better = match &best {
                    Some(current) => score > current.score,
                    None => !score.is_nan(),
                };
                if better {
                    best = Some(SelectionStep {
                        feature: id,
                        relevance: relevance[id],
                        redundancy,
                        score,
                    });
                }
            }

            // Only reachable when every score is NaN.
            let chosen = best.unwrap_or_else(|| {
                let id = candidates[0];
                let redundancy = redundancy_sum[id] / step as f64;
                SelectionStep {
                    feature: id,
                    relevance: relevance[id],
                    redundancy,
                    score: f64::NAN,
                }
            });

            consumed[chosen.feature] = true;
            log::debug!(
                "mRMR step {}: feature {} (relevance {:.6}, redundancy {:.6}, score {:.6})",
                step,
                chosen.feature,
                chosen.relevance,
                chosen.redundancy,
                chosen.score
            );
            selected.push(chosen);
        }

        selected
    }
}
