//! Comparison results.

use serde::{Serialize, Serializer};

use super::precision::PrecisionAdvisory;
use super::MetricSelection;

/// Aggregate PSNR-family value.
///
/// Totals can only be expressed in decibels when every active component has
/// the same dynamic range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AggregatePsnr {
    /// Value computed from the shared dynamic range.
    Defined(#[serde(serialize_with = "serialize_metric")] f64),
    /// Active components have different dynamic ranges.
    MixedRange,
}

impl AggregatePsnr {
    /// Numeric value, if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            AggregatePsnr::Defined(v) => Some(*v),
            AggregatePsnr::MixedRange => None,
        }
    }

    /// Whether the value is defined.
    pub fn is_defined(&self) -> bool {
        matches!(self, AggregatePsnr::Defined(_))
    }
}

/// Writes non-finite values as the strings `Infinity`, `-Infinity` and `NaN`;
/// JSON numbers cannot hold them.
fn serialize_metric<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if *value > 0.0 {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

/// Metrics of a single component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMetrics {
    /// Pixels taking part in the statistics.
    pub pixel_count: u64,
    /// Dynamic range used for PSNR and PSNR-S.
    #[serde(serialize_with = "serialize_metric")]
    pub dynamic_range: f64,
    /// Sum of squared reference samples.
    #[serde(serialize_with = "serialize_metric")]
    pub energy: f64,
    /// Variance of reference samples.
    #[serde(serialize_with = "serialize_metric")]
    pub variance: f64,
    /// Sum of absolute errors.
    #[serde(serialize_with = "serialize_metric")]
    pub abs_error_sum: f64,
    /// Mean absolute error.
    #[serde(serialize_with = "serialize_metric")]
    pub mae: f64,
    /// Peak absolute error.
    #[serde(serialize_with = "serialize_metric")]
    pub pae: f64,
    /// Mean squared error (P-MSE when ROI weights are active).
    #[serde(serialize_with = "serialize_metric")]
    pub mse: f64,
    /// Root mean squared error.
    #[serde(serialize_with = "serialize_metric")]
    pub rmse: f64,
    /// Mean signed error.
    #[serde(serialize_with = "serialize_metric")]
    pub me: f64,
    /// Signal-to-noise ratio from energy.
    #[serde(serialize_with = "serialize_metric")]
    pub snr: f64,
    /// Signal-to-noise ratio from variance.
    #[serde(serialize_with = "serialize_metric")]
    pub snr_variance: f64,
    /// Peak signal-to-noise ratio (P-PSNR when ROI weights are active).
    #[serde(serialize_with = "serialize_metric")]
    pub psnr: f64,
    /// PSNR with the Salomon peak term.
    #[serde(serialize_with = "serialize_metric")]
    pub psnr_salomon: f64,
    /// Whether the component is reproduced exactly.
    pub equal: bool,
}

/// Metrics over all active components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMetrics {
    /// Sum of per-component pixel counts.
    pub pixel_count: u64,
    /// Total energy.
    #[serde(serialize_with = "serialize_metric")]
    pub energy: f64,
    /// Variance around the mean of all active components.
    #[serde(serialize_with = "serialize_metric")]
    pub variance: f64,
    /// Sum of absolute errors.
    #[serde(serialize_with = "serialize_metric")]
    pub abs_error_sum: f64,
    /// Mean absolute error.
    #[serde(serialize_with = "serialize_metric")]
    pub mae: f64,
    /// Largest per-component peak absolute error.
    #[serde(serialize_with = "serialize_metric")]
    pub pae: f64,
    /// Mean squared error.
    #[serde(serialize_with = "serialize_metric")]
    pub mse: f64,
    /// Root mean squared error.
    #[serde(serialize_with = "serialize_metric")]
    pub rmse: f64,
    /// Mean signed error.
    #[serde(serialize_with = "serialize_metric")]
    pub me: f64,
    /// Signal-to-noise ratio from energy.
    #[serde(serialize_with = "serialize_metric")]
    pub snr: f64,
    /// Signal-to-noise ratio from variance.
    #[serde(serialize_with = "serialize_metric")]
    pub snr_variance: f64,
    /// Peak signal-to-noise ratio.
    pub psnr: AggregatePsnr,
    /// PSNR with the Salomon peak term.
    pub psnr_salomon: AggregatePsnr,
    /// Whether every active component is reproduced exactly.
    pub equal: bool,
}

/// Output of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsResult {
    /// One slot per reference component; only active components are populated.
    pub components: Vec<Option<ComponentMetrics>>,
    /// Totals over the active components.
    pub totals: AggregateMetrics,
    /// Metrics the caller intends to read.
    pub requested: MetricSelection,
    /// Whether ROI weights were applied.
    pub weighted: bool,
    /// Whether the mask was inverted by its producer.
    pub mask_inverted: bool,
    /// Precision-loss advisory, when totals exceeded the exact double range.
    pub precision: Option<PrecisionAdvisory>,
}

impl MetricsResult {
    /// Metrics of component `z`, if it was compared.
    pub fn component(&self, z: usize) -> Option<&ComponentMetrics> {
        self.components.get(z).and_then(|c| c.as_ref())
    }

    /// Active components in ascending order.
    pub fn active(&self) -> impl Iterator<Item = (usize, &ComponentMetrics)> {
        self.components
            .iter()
            .enumerate()
            .filter_map(|(z, c)| c.as_ref().map(|m| (z, m)))
    }

    /// Number of compared components.
    pub fn active_count(&self) -> usize {
        self.components.iter().filter(|c| c.is_some()).count()
    }

    /// Whether every compared component is reproduced exactly.
    pub fn is_lossless(&self) -> bool {
        self.totals.equal
    }
}
