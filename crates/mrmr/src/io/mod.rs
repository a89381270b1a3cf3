//! IO utilities for loading labelled sample tables.

pub mod csv_dataset;

pub use csv_dataset::{read_csv, read_csv_from_reader};
