//! Comma-separated sample table reader.
//!
//! The first line is a header whose field count, minus one, fixes the number
//! of features. Every following line holds an integer class label and then
//! exactly that many real values. An empty line has the wrong field count
//! like any other malformed row and fails the load.
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::data_handling::Dataset;

/// Read a labelled sample table from a CSV file.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to open CSV file: {}", path.as_ref().display()))?;
    parse_table(&content)
        .with_context(|| format!("Failed to load CSV file: {}", path.as_ref().display()))
}

/// Read a labelled sample table from any reader.
pub fn read_csv_from_reader<R: Read>(mut rdr: R) -> Result<Dataset> {
    let mut content = String::new();
    rdr.read_to_string(&mut content)
        .context("Failed to read CSV input")?;
    parse_table(&content)
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Rows of the wrong width are reported below with their row number.
    builder.has_headers(true).flexible(true);
    builder
}

/// 1-based data row of the first empty line after the header.
///
/// The csv reader silently drops empty lines, so they are located on the
/// raw text. A single trailing line terminator does not count as a row.
fn first_empty_row(content: &str) -> Option<usize> {
    content
        .lines()
        .skip(1)
        .position(str::is_empty)
        .map(|idx| idx + 1)
}

fn parse_table(content: &str) -> Result<Dataset> {
    let empty_row = first_empty_row(content);
    let mut reader = csv_builder().from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read CSV header row")?;
    let n_features = headers
        .len()
        .checked_sub(1)
        .ok_or_else(|| anyhow!("CSV header row is empty"))?;

    let mut dataset = Dataset::new();
    let mut sample = Vec::with_capacity(n_features);

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        // Rows before the first empty line keep their numbering.
        if empty_row == Some(row) {
            break;
        }
        let record = result.with_context(|| format!("Failed to read row {}", row))?;
        if record.len() != n_features + 1 {
            return Err(anyhow!(
                "Row {} has {} features, expected {}",
                row,
                record.len().saturating_sub(1),
                n_features
            ));
        }

        let class_id = record[0]
            .trim()
            .parse::<i32>()
            .with_context(|| format!("Invalid class label '{}' at row {}", &record[0], row))?;

        sample.clear();
        for (col, field) in record.iter().enumerate().skip(1) {
            let value = field.trim().parse::<f64>().with_context(|| {
                format!("Invalid value '{}' for feature {} at row {}", field, col - 1, row)
            })?;
            sample.push(value);
        }

        dataset
            .add_sample(&sample, class_id)
            .with_context(|| format!("Rejected row {}", row))?;
    }

    if let Some(row) = empty_row {
        return Err(anyhow!("Row {} is empty, expected {} features", row, n_features));
    }

    log::debug!(
        "Loaded {} samples with {} features",
        dataset.n_samples(),
        dataset.n_features()
    );
    Ok(dataset)
}
