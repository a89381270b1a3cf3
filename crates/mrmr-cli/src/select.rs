//! CLI selection helpers for mrmr.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use mrmr::config::SelectionConfig;
use mrmr::io::read_csv;
use mrmr::{Dataset, SelectionStep};

use crate::util::validate_csv_file;

/// Outcome of one selection run.
#[derive(Debug)]
pub struct SelectionResult {
    pub config: SelectionConfig,
    pub n_features: usize,
    pub n_samples: usize,
    pub steps: Vec<SelectionStep>,
}

impl SelectionResult {
    pub fn indices(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.feature).collect()
    }
}

/// Load a validated dataset from a CSV file.
pub fn load_dataset<P: AsRef<Path>>(csv_path: P) -> Result<Dataset> {
    validate_csv_file(&csv_path)?;
    read_csv(&csv_path)
}

/// Load `csv_path` and run the configured selection on it.
pub fn run_selection<P: AsRef<Path>>(csv_path: P, config: &SelectionConfig) -> Result<SelectionResult> {
    let dataset = load_dataset(&csv_path)?;
    log::info!("{}", dataset.summary().trim_end());
    log::info!("{}", config.discretization().describe());

    let steps = config.run(&dataset);
    Ok(SelectionResult {
        config: config.clone(),
        n_features: dataset.n_features(),
        n_samples: dataset.n_samples(),
        steps,
    })
}

/// How a selection is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One selected feature index per line.
    Indices,
    /// TSV with relevance, redundancy and score of every step.
    Scores,
    /// JSON document with the config, table shape and steps.
    Json,
}

/// Write the selection to `out` in the requested format.
pub fn write_selection<W: Write>(result: &SelectionResult, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Indices => {
            for step in &result.steps {
                writeln!(out, "{}", step.feature)?;
            }
        }
        OutputFormat::Scores => {
            writeln!(out, "rank\tfeature\trelevance\tredundancy\tscore")?;
            for (rank, step) in result.steps.iter().enumerate() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    rank, step.feature, step.relevance, step.redundancy, step.score
                )?;
            }
        }
        OutputFormat::Json => {
            let document = serde_json::json!({
                "config": result.config,
                "n_features": result.n_features,
                "n_samples": result.n_samples,
                "selected": result.indices(),
                "steps": result.steps,
            });
            serde_json::to_writer_pretty(&mut out, &document)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write the selection to `output_path`, or to stdout when none is given.
pub fn write_selection_output(
    result: &SelectionResult,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_selection(result, format, BufWriter::new(file))
        }
        None => write_selection(result, format, io::stdout().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrmr::MrmrMethod;

    fn write_csv(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("samples.csv");
        std::fs::write(
            &path,
            "class,noise,signal\n0,0,0\n1,1,1\n0,1,0\n1,0,1\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn run_selection_ranks_signal_first() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path());
        let config = SelectionConfig::new(None, 5, MrmrMethod::Mid);
        let result = run_selection(&csv, &config).unwrap();
        assert_eq!(result.n_features, 2);
        assert_eq!(result.n_samples, 4);
        assert_eq!(result.indices(), vec![1, 0]);
    }

    #[test]
    fn writes_indices_and_scores() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path());
        let result = run_selection(&csv, &SelectionConfig::new(None, 2, MrmrMethod::Miq)).unwrap();

        let mut plain = Vec::new();
        write_selection(&result, OutputFormat::Indices, &mut plain).unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "1\n0\n");

        let mut scored = Vec::new();
        write_selection(&result, OutputFormat::Scores, &mut scored).unwrap();
        let scored = String::from_utf8(scored).unwrap();
        let lines: Vec<&str> = scored.lines().collect();
        assert_eq!(lines[0], "rank\tfeature\trelevance\tredundancy\tscore");
        let first: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(&first[..2], &["0", "1"]);
        assert!((first[2].parse::<f64>().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(first[3], "0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn writes_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path());
        let result = run_selection(&csv, &SelectionConfig::new(Some(0.5), 1, MrmrMethod::Mid)).unwrap();

        let mut buffer = Vec::new();
        write_selection(&result, OutputFormat::Json, &mut buffer).unwrap();
        let document: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(document["selected"], serde_json::json!([1]));
        assert_eq!(document["n_features"], 2);
        assert_eq!(document["config"]["method"], "mid");
        assert_eq!(document["config"]["threshold"], 0.5);
        assert_eq!(document["steps"][0]["feature"], 1);
    }

    #[test]
    fn rejects_non_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        std::fs::write(&path, "class,a\n0,1\n").unwrap();
        assert!(run_selection(&path, &SelectionConfig::default()).is_err());
    }
}
