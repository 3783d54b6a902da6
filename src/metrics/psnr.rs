//! Dynamic range model and decibel formulas.
//!
//! PSNR-family metrics compare the mean squared error against the square of
//! the dynamic range of a component:
//!
//! - Without ROI weights: `range = 2^bits - 1`
//! - With ROI weights: `range = 2^bits * max_weight - 1`, since weighted
//!   differences may exceed the unweighted sample span.
//!
//! Lossless components (MSE = 0) report `f64::INFINITY`.

use super::roi::RoiWeights;

/// Nominal dynamic range for a bit depth.
///
/// `max_weight` is the largest weight anywhere in the ROI table, not just the
/// weights used by the component.
pub fn dynamic_range(bit_depth: u32, weights: Option<&RoiWeights>) -> f64 {
    let span = 2f64.powi(bit_depth as i32);
    match weights {
        Some(table) => span * table.max_weight() - 1.0,
        None => span - 1.0,
    }
}

/// Dynamic range observed from the actual sample extent of a component.
///
/// Samples are assumed signed: the bit depth is the number of magnitude bits
/// needed for either extreme plus one sign bit. Used only to estimate the
/// precision needed by wide sample types that are sparsely populated.
pub fn observed_range(min: f64, max: f64, weights: Option<&RoiWeights>) -> f64 {
    let positive_bits = if max + 1.0 > 0.0 {
        (max + 1.0).log2().ceil()
    } else {
        0.0
    };
    let negative_bits = if min < 0.0 {
        min.abs().log2().ceil()
    } else {
        0.0
    };
    let bits = positive_bits.max(negative_bits).max(0.0) as u32 + 1;
    dynamic_range(bits, weights)
}

/// Peak signal-to-noise ratio in decibels.
pub fn psnr(range: f64, mse: f64) -> f64 {
    10.0 * (range * range / mse).log10()
}

/// PSNR with the peak term `(range + 1)^2 / 4`, after Salomon.
pub fn psnr_salomon(range: f64, mse: f64) -> f64 {
    10.0 * ((range + 1.0) * (range + 1.0) / (4.0 * mse)).log10()
}

/// Signal-to-noise ratio of the signal energy against the total squared error.
pub fn snr(energy: f64, mse: f64, pixels: u64) -> f64 {
    10.0 * (energy / (mse * pixels as f64)).log10()
}

/// Signal-to-noise ratio of the signal variance against the mean squared error.
pub fn snr_variance(variance: f64, mse: f64) -> f64 {
    10.0 * (variance / mse).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_range() {
        assert_eq!(dynamic_range(8, None), 255.0);
        assert_eq!(dynamic_range(12, None), 4095.0);
        assert_eq!(dynamic_range(16, None), 65535.0);
        assert_eq!(dynamic_range(0, None), 0.0);
    }

    #[test]
    fn test_dynamic_range_weighted() {
        let table = RoiWeights::from_pairs(&[0.0, 1.0, 255.0, 4.0]).unwrap();
        assert_eq!(dynamic_range(8, Some(&table)), 1023.0);
    }

    #[test]
    fn test_observed_range() {
        // 0..=100 needs 7 magnitude bits plus sign
        assert_eq!(observed_range(0.0, 100.0, None), 255.0);
        // -1000 needs 10 magnitude bits plus sign
        assert_eq!(observed_range(-1000.0, 10.0, None), 2047.0);
        assert_eq!(observed_range(-5.0, -2.0, None), 15.0);
    }

    #[test]
    fn test_psnr_values() {
        let expected = 10.0 * (255.0f64 * 255.0 / 5.0).log10();
        assert!((psnr(255.0, 5.0) - expected).abs() < 1e-12);
        assert!(psnr(255.0, 0.0).is_infinite());
        // PSNR-S with range 255 equals 10*log10(128^2/mse)
        assert!((psnr_salomon(255.0, 1.0) - 10.0 * 16384f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_larger_range_raises_psnr() {
        let mse = 12.5;
        assert!(psnr(dynamic_range(16, None), mse) > psnr(dynamic_range(8, None), mse));
        assert!(
            psnr_salomon(dynamic_range(16, None), mse) > psnr_salomon(dynamic_range(8, None), mse)
        );
    }

    #[test]
    fn test_snr_values() {
        assert!((snr(400.0, 1.0, 4) - 20.0).abs() < 1e-12);
        assert!((snr_variance(10.0, 1.0) - 10.0).abs() < 1e-12);
    }
}
