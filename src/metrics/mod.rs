//! Distortion metrics between a reference and a test raster.
//!
//! This module provides the comparison engine:
//! - **MAE / PAE**: mean and peak absolute error
//! - **MSE / RMSE / ME**: mean squared, root mean squared and mean signed error
//! - **SNR / SNR-VAR**: signal-to-noise ratio from energy or variance
//! - **PSNR / PSNR-S**: peak signal-to-noise ratio and the Salomon variant
//! - **EQUAL**: exact reproduction
//!
//! Pixels can be restricted by an inclusion mask or weighted through an ROI
//! weight table (P-MSE, P-PSNR).
//!
//! # Example
//!
//! ```rust,ignore
//! use rastercmp::metrics::{Comparator, ComponentSelection};
//!
//! let result = Comparator::new(&original, &decoded, &[8])
//!     .component(ComponentSelection::All)
//!     .compare()?;
//! println!("PSNR: {:?}", result.totals.psnr);
//! ```

mod accumulator;
mod comparator;
pub mod precision;
pub mod psnr;
mod result;
mod roi;

pub use comparator::Comparator;
pub use precision::PrecisionAdvisory;
pub use psnr::{dynamic_range, observed_range};
pub use result::{AggregateMetrics, AggregatePsnr, ComponentMetrics, MetricsResult};
pub use roi::{RoiWeight, RoiWeights};

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::raster::Shape;

/// Components taking part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSelection {
    /// Every component of the reference raster.
    #[default]
    All,
    /// A single 0-based component of the reference raster.
    Single(usize),
}

impl ComponentSelection {
    /// Active component indices in ascending order.
    pub fn resolve(&self, components: usize) -> Result<Vec<usize>> {
        match *self {
            ComponentSelection::All => Ok((0..components).collect()),
            ComponentSelection::Single(z) if z < components => Ok(vec![z]),
            ComponentSelection::Single(z) => Err(CompareError::Component(format!(
                "component {} requested but the reference raster has {} components",
                z, components
            ))),
        }
    }
}

/// A single distortion metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Mean absolute error.
    Mae,
    /// Peak absolute error.
    Pae,
    /// Mean squared error.
    Mse,
    /// Root mean squared error.
    Rmse,
    /// Mean signed error.
    Me,
    /// Signal-to-noise ratio.
    Snr,
    /// Peak signal-to-noise ratio.
    Psnr,
    /// Salomon PSNR.
    PsnrSalomon,
    /// Signal-to-noise ratio from variance.
    SnrVariance,
    /// Exact equality.
    Equal,
}

impl Metric {
    /// Every metric in report order.
    pub const ALL: [Metric; 10] = [
        Metric::Mae,
        Metric::Pae,
        Metric::Mse,
        Metric::Rmse,
        Metric::Me,
        Metric::Snr,
        Metric::Psnr,
        Metric::PsnrSalomon,
        Metric::SnrVariance,
        Metric::Equal,
    ];
}

/// Metrics a caller intends to read. Does not change what is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSelection {
    /// Every metric.
    #[default]
    All,
    /// One metric.
    Only(Metric),
}

impl MetricSelection {
    /// Whether `metric` is selected.
    pub fn includes(&self, metric: Metric) -> bool {
        match self {
            MetricSelection::All => true,
            MetricSelection::Only(m) => *m == metric,
        }
    }

    /// Selected metrics in report order.
    pub fn metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .filter(|m| self.includes(*m))
            .collect()
    }
}

/// Validate that two rasters can be compared under a component selection.
///
/// Comparing all components requires identical shapes. Comparing a single
/// component only requires matching rows and columns; the test raster then
/// holds either that one component or as many components as the reference.
pub(crate) fn validate_shapes(
    reference: Shape,
    test: Shape,
    selection: ComponentSelection,
) -> Result<()> {
    match selection {
        ComponentSelection::All => {
            if reference != test {
                return Err(CompareError::Shape(format!(
                    "image sizes must be the same to perform comparisons: {} vs {}",
                    reference, test
                )));
            }
        }
        ComponentSelection::Single(_) => {
            if !reference.same_plane(&test) {
                return Err(CompareError::Shape(format!(
                    "image rows and columns must match to compare a single component: {} vs {}",
                    reference, test
                )));
            }
            if test.components != 1 && test.components != reference.components {
                return Err(CompareError::Shape(format!(
                    "test image must have 1 or {} components, got {}",
                    reference.components, test.components
                )));
            }
        }
    }
    Ok(())
}

/// Expand per-component bit depths to `components` entries.
///
/// Missing trailing entries repeat the last given depth.
pub fn expand_bit_depths(bit_depths: &[i32], components: usize) -> Result<Vec<u32>> {
    let last = *bit_depths
        .last()
        .ok_or_else(|| CompareError::BitDepth("at least one bit depth is required".into()))?;

    if let Some(negative) = bit_depths.iter().find(|&&b| b < 0) {
        return Err(CompareError::BitDepth(format!(
            "pixel bit depth must be positive, got {}",
            negative
        )));
    }

    Ok((0..components.max(bit_depths.len()))
        .map(|z| bit_depths.get(z).copied().unwrap_or(last) as u32)
        .collect())
}
