//! mrmr: minimum-Redundancy-Maximum-Relevance feature selection.
//!
//! This crate provides the sample table (`Dataset`), the z-score and ternary
//! discretization pipeline, a mutual information estimator over discrete
//! states, and the greedy MID/MIQ selector, plus a CSV loader and a JSON
//! selection config used by the command-line front end.
//!
//! ```no_run
//! use mrmr::{Dataset, Discretization, MrmrMethod};
//!
//! let dataset = mrmr::io::read_csv("lung.csv")?;
//! let selected = dataset.process(Discretization::from(0.0), 10, MrmrMethod::Mid);
//! println!("{:?}", selected);
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_selection;
pub mod io;
pub mod preprocessing;

pub use data_handling::Dataset;
pub use error::MrmrError;
pub use feature_selection::{MrmrMethod, MrmrSelector, MutualInfoEstimator, SelectionStep, Variable};
pub use preprocessing::{Discretization, WorkingView};
