//! Floating-point precision advisories.
//!
//! Doubles hold every integer up to `2^53 - 1` exactly. Sums of many large
//! samples can exceed that bound, at which point the accumulated totals are
//! no longer exact. After accumulation the comparator checks each risky total
//! and, when one overflows the exact range, reports how many extra mantissa
//! bits would have been needed and which metric families remain reliable.

use serde::Serialize;

/// Largest integer a double represents exactly.
pub const LARGEST_EXACT_DOUBLE: f64 = 9_007_199_254_740_991.0;

/// Stored mantissa bits of a double.
pub const MANTISSA_BITS: u32 = 52;

/// Extra mantissa bits needed to keep `sum` exact.
pub fn imprecision_bits(sum: f64) -> u32 {
    if sum > LARGEST_EXACT_DOUBLE {
        (sum / LARGEST_EXACT_DOUBLE).log2().ceil() as u32
    } else {
        0
    }
}

/// Running maximum of [`imprecision_bits`] over several totals.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ImprecisionTracker {
    missing_bits: u32,
}

impl ImprecisionTracker {
    pub(crate) fn check(&mut self, sum: f64) {
        self.missing_bits = self.missing_bits.max(imprecision_bits(sum));
    }

    pub(crate) fn missing_bits(&self) -> u32 {
        self.missing_bits
    }
}

/// Image dimensions and sample range that drive the precision estimate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrecisionInputs {
    /// Samples in the whole reference volume.
    pub voxels: f64,
    /// Samples in one component plane.
    pub plane_pixels: f64,
    /// Largest dynamic range over the active components.
    pub max_range: f64,
}

/// Report of lost exactness in the accumulated totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrecisionAdvisory {
    /// Minimum number of additional mantissa bits that would keep every
    /// total exact.
    pub missing_bits: u32,
    /// Bits needed to accumulate squared errors over the whole volume.
    pub required_bits: u32,
    /// Whether metrics not derived from squared errors (MAE, PAE, ME) are
    /// still exact over the whole volume.
    pub non_mse_exact: bool,
    /// Whether per-component results are still exact.
    pub per_component_exact: bool,
    /// Whether per-component metrics not derived from squared errors are
    /// still exact.
    pub per_component_non_mse_exact: bool,
}

impl PrecisionAdvisory {
    /// Build an advisory when `missing_bits` is positive.
    pub(crate) fn assess(missing_bits: u32, inputs: PrecisionInputs) -> Option<Self> {
        if missing_bits == 0 {
            return None;
        }

        let range = inputs.max_range;
        // Squared errors grow with range^2, absolute errors with range.
        let bits = |magnitude: f64| magnitude.log2().ceil().max(0.0) as u32;

        Some(Self {
            missing_bits,
            required_bits: bits(inputs.voxels * range * range),
            non_mse_exact: bits(inputs.voxels * range) <= MANTISSA_BITS,
            per_component_exact: bits(inputs.plane_pixels * range * range) <= MANTISSA_BITS,
            per_component_non_mse_exact: bits(inputs.plane_pixels * range) <= MANTISSA_BITS,
        })
    }

    /// Whether the volume is too large for exact computation of every metric.
    pub fn exceeds_mantissa(&self) -> bool {
        self.required_bits > MANTISSA_BITS
    }

    /// Human-readable advisory lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Inexact results may be produced due to insufficient mantissa bits \
             (at least {} more bits required).",
            self.missing_bits
        )];

        if self.exceeds_mantissa() {
            lines.push(format!(
                "Image too large for exact computations. Required precision for this image is {} bits.",
                self.required_bits
            ));
            if self.non_mse_exact {
                lines.push("* All but MSE related measures (MSE, PSNR, SNR) are still accurate.".into());
            }
            if self.per_component_exact {
                lines.push("* Individual component results are still accurate.".into());
            }
            if self.per_component_non_mse_exact && !self.non_mse_exact && !self.per_component_exact {
                lines.push(
                    "* Individual component results of all but MSE related measures (MSE, PSNR, SNR) are still accurate."
                        .into(),
                );
            }
        }

        lines
    }
}

impl std::fmt::Display for PrecisionAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
