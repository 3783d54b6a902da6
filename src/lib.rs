//! Raster Comparison Library
//!
//! Distortion metrics between a reference raster and a test raster, as used
//! to evaluate lossy and lossless image coders.
//!
//! # Features
//!
//! - **Error metrics**: MAE, PAE, MSE, RMSE and ME per component and in total
//! - **Signal metrics**: SNR, SNR from variance, PSNR and Salomon PSNR
//! - **Masks**: inclusion masks, no-data masks and ROI weight tables (P-MSE, P-PSNR)
//! - **Precision advisories**: warnings when sums exceed exact double precision
//! - **Image I/O**: visual formats through `image` and raw band-sequential samples
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rastercmp::{io, Comparator};
//!
//! let reference = io::load_image("original.png", None)?;
//! let test = io::load_image("decoded.png", None)?;
//!
//! let result = Comparator::new(&reference.raster, &test.raster, &[8]).compare()?;
//! for (z, metrics) in result.active() {
//!     println!("component {}: PSNR {:.2} dB", z, metrics.psnr);
//! }
//! ```
//!
//! # Region of interest
//!
//! With an ROI weight table, the mask holds labels and each pixel difference
//! is scaled by the weight of its label. The dynamic range is scaled by the
//! largest weight, so a table of unit weights gives the unweighted result:
//!
//! ```rust,ignore
//! let weights = RoiWeights::from_pairs(&[255.0, 4.0])?;
//! let result = Comparator::new(&reference, &test, &[8])
//!     .mask(&labels)
//!     .roi_weights(&weights)
//!     .compare()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod metrics;
pub mod raster;
pub mod report;

// Re-export commonly used types
pub use config::{CompareConfig, OutputFormat, TotalsMode};
pub use error::{CompareError, Result};
pub use metrics::{
    AggregatePsnr, Comparator, ComponentSelection, Metric, MetricSelection, MetricsResult,
    RoiWeight, RoiWeights,
};
pub use raster::{Mask, Raster, Shape};

/// Library version information.
pub mod version {
    /// Library version string.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Library name.
    pub const NAME: &str = env!("CARGO_PKG_NAME");

    /// Get full version string.
    pub fn full_version() -> String {
        format!("{} {}", NAME, VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version() {
        assert_eq!(version::full_version(), format!("rastercmp {}", version::VERSION));
    }

    #[test]
    fn test_lossless_round_trip() {
        let raster = Raster::from_planes(vec![
            vec![vec![0.0, 255.0], vec![128.0, 7.0]],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        ])
        .unwrap();

        let result = Comparator::new(&raster, &raster.clone(), &[8])
            .compare()
            .unwrap();
        assert!(result.is_lossless());
        assert_eq!(result.totals.psnr, AggregatePsnr::Defined(f64::INFINITY));
        assert_eq!(result.active_count(), 2);
    }
}
