//! Configuration types for comparison runs and report output.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::metrics::{ComponentSelection, MetricSelection, RoiWeight, RoiWeights};

/// Report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One labelled line per metric.
    #[default]
    Long,
    /// One colon-separated line per component.
    Short,
    /// The full result as JSON.
    Json,
}

/// Which blocks of the report are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TotalsMode {
    /// Per-component results only.
    Components,
    /// Per-component results followed by totals.
    #[default]
    Both,
    /// Totals only.
    TotalsOnly,
}

/// Configuration of a comparison run.
///
/// Every field has a default, so a TOML file only needs the options it
/// changes:
///
/// ```toml
/// bit_depths = [12]
/// component = 2
/// format = "short"
///
/// [[roi_weights]]
/// label = 255
/// weight = 4.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Nominal bit depth per component; taken from the reference image
    /// when absent.
    pub bit_depths: Option<Vec<i32>>,
    /// 1-based component to compare; all components when absent.
    pub component: Option<usize>,
    /// Invert the mask before comparing.
    pub inverse: bool,
    /// Reference sample values excluded from the comparison.
    pub no_data_values: Option<Vec<f64>>,
    /// ROI label weights (P-MSE, P-PSNR).
    pub roi_weights: Option<Vec<RoiWeight>>,
    /// Metrics to report.
    pub metric: MetricSelection,
    /// Report layout.
    pub format: OutputFormat,
    /// Report blocks.
    pub totals: TotalsMode,
    /// Worker threads for per-component passes.
    pub threads: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            bit_depths: None,
            component: None,
            inverse: false,
            no_data_values: None,
            roi_weights: None,
            metric: MetricSelection::All,
            format: OutputFormat::Long,
            totals: TotalsMode::Both,
            threads: num_cpus::get(),
        }
    }
}

impl CompareConfig {
    /// Load a configuration from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&text)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate option values.
    pub fn validate(&self) -> Result<()> {
        if let Some(depths) = &self.bit_depths {
            if depths.is_empty() {
                return Err(CompareError::BitDepth(
                    "bit depth list must not be empty".into(),
                ));
            }
            if let Some(bad) = depths.iter().find(|&&b| b < 0) {
                return Err(CompareError::BitDepth(format!(
                    "pixel bit depth must be positive, got {}",
                    bad
                )));
            }
        }
        if self.component == Some(0) {
            return Err(CompareError::Config(
                "component must be greater than 0".into(),
            ));
        }
        if self.threads == 0 {
            return Err(CompareError::Config(
                "thread count must be at least 1".into(),
            ));
        }
        self.roi_table()?;
        Ok(())
    }

    /// Component selection for the comparator (0-based).
    pub fn selection(&self) -> ComponentSelection {
        match self.component {
            Some(c) if c > 0 => ComponentSelection::Single(c - 1),
            _ => ComponentSelection::All,
        }
    }

    /// Validated ROI weight table, if configured.
    pub fn roi_table(&self) -> Result<Option<RoiWeights>> {
        self.roi_weights
            .as_ref()
            .map(|entries| RoiWeights::new(entries.clone()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;

    #[test]
    fn test_default_config_is_valid() {
        let config = CompareConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selection(), ComponentSelection::All);
        assert!(config.roi_table().unwrap().is_none());
    }

    #[test]
    fn test_component_is_one_based() {
        let config = CompareConfig {
            component: Some(2),
            ..Default::default()
        };
        assert_eq!(config.selection(), ComponentSelection::Single(1));

        let zero = CompareConfig {
            component: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_negative_bit_depth_rejected() {
        let config = CompareConfig {
            bit_depths: Some(vec![8, -1]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CompareError::BitDepth(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.toml");
        fs::write(
            &path,
            r#"
bit_depths = [12, 16]
component = 3
format = "short"
totals = "totals_only"
metric = { only = "psnr-salomon" }
threads = 2

[[roi_weights]]
label = 255
weight = 4.0
"#,
        )
        .unwrap();

        let config = CompareConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.bit_depths, Some(vec![12, 16]));
        assert_eq!(config.selection(), ComponentSelection::Single(2));
        assert_eq!(config.format, OutputFormat::Short);
        assert_eq!(config.totals, TotalsMode::TotalsOnly);
        assert_eq!(config.metric, MetricSelection::Only(Metric::PsnrSalomon));
        assert_eq!(config.threads, 2);
        assert!(!config.inverse);

        let table = config.roi_table().unwrap().unwrap();
        assert_eq!(table.weight_for(255), 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "format = 3").unwrap();
        assert!(matches!(
            CompareConfig::from_toml_file(&path),
            Err(CompareError::Toml(_))
        ));
    }
}
