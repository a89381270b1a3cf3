//! Feature selection utilities.
//!
//! This module contains the discrete mutual information estimator and the
//! greedy mRMR selector built on top of it.
pub mod mrmr;
pub mod mutual_info;

pub use mrmr::{MrmrMethod, MrmrSelector, SelectionStep};
pub use mutual_info::{MutualInfoEstimator, StateCodes, Variable};
