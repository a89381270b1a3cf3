use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data_handling::Dataset;
use crate::feature_selection::mrmr::{MrmrMethod, SelectionStep};
use crate::preprocessing::Discretization;

/// Parameters of one selection request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Discretization threshold on z-scores; `None` keeps the raw values.
    pub threshold: Option<f64>,
    /// Number of features to select, capped at the dataset's feature count.
    pub n_features: usize,
    pub method: MrmrMethod,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            n_features: 500,
            method: MrmrMethod::Mid,
        }
    }
}

impl SelectionConfig {
    pub fn new(threshold: Option<f64>, n_features: usize, method: MrmrMethod) -> Self {
        Self {
            threshold,
            n_features,
            method,
        }
    }

    pub fn discretization(&self) -> Discretization {
        Discretization::from(self.threshold)
    }

    /// Run the configured selection on `dataset`.
    pub fn run(&self, dataset: &Dataset) -> Vec<SelectionStep> {
        dataset.process_with_scores(self.discretization(), self.n_features, self.method)
    }
}

/// Load a selection configuration from a JSON file.
pub fn load_selection_config<P: AsRef<Path>>(path: P) -> Result<SelectionConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: SelectionConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_500_raw_features_with_mid() {
        let config = SelectionConfig::default();
        assert_eq!(config.threshold, None);
        assert_eq!(config.discretization(), Discretization::Raw);
        assert_eq!(config.n_features, 500);
        assert_eq!(config.method, MrmrMethod::Mid);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SelectionConfig =
            serde_json::from_str(r#"{ "threshold": 0.0, "method": "miq" }"#).unwrap();
        assert_eq!(config.threshold, Some(0.0));
        assert_eq!(config.method, MrmrMethod::Miq);
        assert_eq!(config.n_features, 500);
        assert_eq!(
            config.discretization(),
            Discretization::Ternary { threshold: 0.0 }
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        let parsed = serde_json::from_str::<SelectionConfig>(r#"{ "method": "max" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        let config = SelectionConfig::new(Some(1.0), 3, MrmrMethod::Miq);
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = load_selection_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_selection_config("/nonexistent/selection.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/selection.json"));
    }

    #[test]
    fn run_uses_configured_request() {
        let dataset = Dataset::from_samples(
            &[vec![0.0, 1.0], vec![1.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]],
            &[0, 1, 0, 1],
        )
        .unwrap();
        let steps = SelectionConfig::new(None, 1, MrmrMethod::Mid).run(&dataset);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].feature, 0);
        assert!((steps[0].relevance - 1.0).abs() < 1e-12);
    }
}
