//! Raster comparator.
//!
//! Runs the whole comparison in one eager call:
//!
//! 1. validate shapes, mask, component selector and bit depths
//! 2. first pass per component: included pixels, sums, energies and the
//!    masked or ROI-weighted error sums, then the global mean
//! 3. second pass per component: squared deviations from the component
//!    mean and from the global mean
//! 4. per-component and aggregate metrics
//! 5. precision-loss check of the aggregate sums
//!
//! Steps 2 and 3 are separate passes: variances are sums of squared
//! deviations, never `E[x^2] - E[x]^2`.

use rayon::prelude::*;

use super::accumulator::{Deviations, ErrorAccumulator, Moments, PlaneView, Weighting};
use super::precision::{ImprecisionTracker, PrecisionAdvisory, PrecisionInputs};
use super::psnr::{dynamic_range, observed_range, psnr, psnr_salomon, snr, snr_variance};
use super::result::{AggregateMetrics, AggregatePsnr, ComponentMetrics, MetricsResult};
use super::roi::RoiWeights;
use super::{expand_bit_depths, validate_shapes, ComponentSelection, MetricSelection};
use crate::error::{CompareError, Result};
use crate::raster::{Mask, Raster};

/// Bit depths above this use the observed sample range in precision estimates.
const OBSERVED_RANGE_MIN_BITS: u32 = 12;

/// Compares a test raster against a reference raster.
#[derive(Debug, Clone)]
pub struct Comparator<'a> {
    reference: &'a Raster,
    test: &'a Raster,
    bit_depths: Vec<i32>,
    mask: Option<&'a Mask>,
    roi: Option<&'a RoiWeights>,
    selection: ComponentSelection,
    requested: MetricSelection,
    inverted: bool,
    threads: usize,
}

/// Results of the first pass over one component.
#[derive(Debug, Clone, Copy)]
struct FirstPass {
    pixels: u64,
    moments: Moments,
    errors: ErrorAccumulator,
}

impl<'a> Comparator<'a> {
    /// Create a comparator.
    ///
    /// # Arguments
    ///
    /// * `reference` - The original raster
    /// * `test` - The reconstructed raster
    /// * `bit_depths` - Nominal bit depth per component; the last entry is
    ///   repeated for components without one
    pub fn new(reference: &'a Raster, test: &'a Raster, bit_depths: &[i32]) -> Self {
        Self {
            reference,
            test,
            bit_depths: bit_depths.to_vec(),
            mask: None,
            roi: None,
            selection: ComponentSelection::All,
            requested: MetricSelection::All,
            inverted: false,
            threads: num_cpus::get(),
        }
    }

    /// Restrict the comparison to pixels flagged in `mask`, or provide the
    /// labels for ROI weighting. The mask must have the test raster's shape.
    pub fn mask(mut self, mask: &'a Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Weight per-pixel differences by the mask label (P-MSE, P-PSNR).
    pub fn roi_weights(mut self, weights: &'a RoiWeights) -> Self {
        self.roi = Some(weights);
        self
    }

    /// Select the compared components.
    pub fn component(mut self, selection: ComponentSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Record which metrics the caller intends to read.
    pub fn metrics(mut self, requested: MetricSelection) -> Self {
        self.requested = requested;
        self
    }

    /// Record that the mask was inverted by its producer.
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Number of worker threads used for per-component passes.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Accept precomputed energies and variances.
    ///
    /// Both are recomputed from the reference raster; the values are ignored.
    #[deprecated(note = "energy and variance are always recomputed from the reference raster")]
    pub fn precomputed_moments(self, energy: &[f64], variance: &[f64]) -> Self {
        if !energy.is_empty() || !variance.is_empty() {
            log::warn!("Ignoring precomputed energy/variance; both are recomputed");
        }
        self
    }

    /// Run the comparison.
    ///
    /// # Errors
    ///
    /// Returns an error, before any accumulation, if the raster shapes do not
    /// match, the mask shape differs from the test raster, the component
    /// selector is out of range, a bit depth is negative, or ROI weights are
    /// given without a mask.
    pub fn compare(&self) -> Result<MetricsResult> {
        let reference_shape = self.reference.shape();
        let test_shape = self.test.shape();

        let active = self.selection.resolve(reference_shape.components)?;
        validate_shapes(reference_shape, test_shape, self.selection)?;

        if let Some(mask) = self.mask {
            if mask.shape() != test_shape {
                return Err(CompareError::Mask(format!(
                    "mask sizes must be the same as the test image: {} vs {}",
                    mask.shape(),
                    test_shape
                )));
            }
        }
        if self.roi.is_some() && self.mask.is_none() {
            return Err(CompareError::Mask(
                "ROI weights require a mask providing the labels".into(),
            ));
        }

        let bit_depths = expand_bit_depths(&self.bit_depths, reference_shape.components)?;

        log::debug!(
            "Comparing {} against {} over components {:?} (mask: {}, ROI: {})",
            reference_shape,
            test_shape,
            active,
            self.mask.is_some(),
            self.roi.is_some()
        );

        let lookup = self.roi.map(RoiWeights::lookup_table);
        let views: Vec<PlaneView<'_>> = active
            .iter()
            .map(|&z| self.plane_view(z, lookup.as_ref()))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| CompareError::Internal(e.to_string()))?;

        let mut tracker = ImprecisionTracker::default();

        // First pass: counts, sums, energies and error sums.
        let first: Vec<FirstPass> = pool.install(|| {
            views
                .par_iter()
                .map(|view| FirstPass {
                    pixels: view.pixel_count(),
                    moments: view.moments(),
                    errors: view.errors(),
                })
                .collect()
        });

        let mut total_pixels = 0u64;
        let mut total_sum = 0.0;
        let mut total_energy = 0.0;
        for pass in &first {
            total_pixels += pass.pixels;
            total_sum += pass.moments.sum;
            total_energy += pass.moments.squared_sum;
        }
        tracker.check(total_energy);
        tracker.check(total_sum);

        let global_mean = total_sum / total_pixels as f64;
        let means: Vec<f64> = first
            .iter()
            .map(|pass| pass.moments.sum / pass.pixels as f64)
            .collect();

        // Second pass: deviations around the component and global means.
        let deviations: Vec<Deviations> = pool.install(|| {
            views
                .par_iter()
                .zip(means.par_iter())
                .map(|(view, &mean)| view.deviations(mean, global_mean))
                .collect()
        });

        let total_squared_deviation: f64 = deviations.iter().map(|d| d.global).sum();
        tracker.check(total_squared_deviation);

        let mut components = vec![None; reference_shape.components];
        let mut ranges = Vec::with_capacity(active.len());
        let mut total_errors = ErrorAccumulator::new();

        for ((&z, pass), deviation) in active.iter().zip(&first).zip(&deviations) {
            let range = dynamic_range(bit_depths[z], self.roi);
            ranges.push(range);
            total_errors.merge(&pass.errors);
            components[z] = Some(component_metrics(pass, deviation, range));
        }

        tracker.check(total_errors.abs_sum);
        tracker.check(total_errors.peak);
        tracker.check(total_errors.squared_sum);

        let shared_range = ranges
            .split_first()
            .and_then(|(first, rest)| rest.iter().all(|r| r == first).then_some(*first));
        if shared_range.is_none() {
            log::debug!("Dynamic range differs across components; aggregate PSNR undefined");
        }

        let totals = aggregate_metrics(
            total_pixels,
            total_energy,
            total_squared_deviation / total_pixels as f64,
            &total_errors,
            shared_range,
        );

        let precision = PrecisionAdvisory::assess(
            tracker.missing_bits(),
            PrecisionInputs {
                voxels: reference_shape.len() as f64,
                plane_pixels: reference_shape.plane_len() as f64,
                max_range: active
                    .iter()
                    .map(|&z| self.precision_range(z, bit_depths[z]))
                    .fold(0.0, f64::max),
            },
        );
        if let Some(advisory) = &precision {
            for line in advisory.lines() {
                log::warn!("{}", line);
            }
        }

        Ok(MetricsResult {
            components,
            totals,
            requested: self.requested,
            weighted: self.roi.is_some(),
            mask_inverted: self.inverted,
            precision,
        })
    }

    /// Index of the test/mask plane paired with reference component `z`.
    fn test_plane(&self, z: usize) -> usize {
        if self.test.components() == self.reference.components() {
            z
        } else {
            0
        }
    }

    fn plane_view<'b>(&'b self, z: usize, lookup: Option<&'b [f64; 256]>) -> PlaneView<'b> {
        let t = self.test_plane(z);
        let weighting = match (self.mask, lookup) {
            (Some(mask), Some(weights)) => Weighting::Roi {
                labels: mask.plane(t),
                weights,
            },
            (Some(mask), None) => Weighting::Inclusion(mask.plane(t)),
            (None, _) => Weighting::Unmasked,
        };
        PlaneView {
            reference: self.reference.plane(z),
            test: self.test.plane(t),
            weighting,
        }
    }

    /// Range used to estimate required precision for component `z`.
    fn precision_range(&self, z: usize, bit_depth: u32) -> f64 {
        if bit_depth > OBSERVED_RANGE_MIN_BITS {
            let (ref_min, ref_max) = self.reference.plane_extent(z);
            let (test_min, test_max) = self.test.plane_extent(self.test_plane(z));
            observed_range(ref_min.min(test_min), ref_max.max(test_max), self.roi)
        } else {
            dynamic_range(bit_depth, self.roi)
        }
    }
}

fn component_metrics(pass: &FirstPass, deviation: &Deviations, range: f64) -> ComponentMetrics {
    let pixels = pass.pixels as f64;
    let errors = &pass.errors;
    let variance = deviation.own / pixels;
    let mse = errors.squared_sum / pixels;

    ComponentMetrics {
        pixel_count: pass.pixels,
        dynamic_range: range,
        energy: pass.moments.squared_sum,
        variance,
        abs_error_sum: errors.abs_sum,
        mae: errors.abs_sum / pixels,
        pae: errors.peak,
        mse,
        rmse: mse.sqrt(),
        me: errors.signed_sum / pixels,
        snr: snr(pass.moments.squared_sum, mse, pass.pixels),
        snr_variance: snr_variance(variance, mse),
        psnr: psnr(range, mse),
        psnr_salomon: psnr_salomon(range, mse),
        equal: errors.abs_sum == 0.0,
    }
}

fn aggregate_metrics(
    pixel_count: u64,
    energy: f64,
    variance: f64,
    errors: &ErrorAccumulator,
    shared_range: Option<f64>,
) -> AggregateMetrics {
    let pixels = pixel_count as f64;
    let mse = errors.squared_sum / pixels;
    let peak = |f: fn(f64, f64) -> f64| {
        shared_range.map_or(AggregatePsnr::MixedRange, |range| {
            AggregatePsnr::Defined(f(range, mse))
        })
    };

    AggregateMetrics {
        pixel_count,
        energy,
        variance,
        abs_error_sum: errors.abs_sum,
        mae: errors.abs_sum / pixels,
        pae: errors.peak,
        mse,
        rmse: mse.sqrt(),
        me: errors.signed_sum / pixels,
        snr: snr(energy, mse, pixel_count),
        snr_variance: snr_variance(variance, mse),
        psnr: peak(psnr),
        psnr_salomon: peak(psnr_salomon),
        equal: errors.abs_sum == 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Metric, RoiWeights};
    use crate::raster::Shape;

    const EPSILON: f64 = 1e-9;

    fn create_test_raster(planes: &[[[f64; 2]; 2]]) -> Raster {
        Raster::from_planes(
            planes
                .iter()
                .map(|p| p.iter().map(|row| row.to_vec()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn reference_2x2() -> Raster {
        create_test_raster(&[[[10.0, 20.0], [30.0, 40.0]]])
    }

    fn test_2x2() -> Raster {
        create_test_raster(&[[[12.0, 20.0], [30.0, 44.0]]])
    }

    fn create_multi_component() -> (Raster, Raster) {
        let reference = create_test_raster(&[
            [[10.0, 20.0], [30.0, 40.0]],
            [[100.0, 110.0], [120.0, 130.0]],
            [[0.0, 255.0], [128.0, 64.0]],
        ]);
        let test = create_test_raster(&[
            [[11.0, 20.0], [29.0, 40.0]],
            [[100.0, 115.0], [120.0, 125.0]],
            [[3.0, 250.0], [128.0, 64.0]],
        ]);
        (reference, test)
    }

    #[test]
    fn test_identical_rasters() {
        let reference = reference_2x2();
        let result = Comparator::new(&reference, &reference, &[8])
            .compare()
            .unwrap();

        let c = result.component(0).unwrap();
        assert!(c.equal);
        assert_eq!(c.mae, 0.0);
        assert_eq!(c.pae, 0.0);
        assert_eq!(c.mse, 0.0);
        assert_eq!(c.rmse, 0.0);
        assert_eq!(c.me, 0.0);
        assert!(c.psnr.is_infinite() && c.psnr > 0.0);
        assert!(c.psnr_salomon.is_infinite() && c.psnr_salomon > 0.0);
        assert!(c.snr.is_infinite() && c.snr > 0.0);
        assert!(result.is_lossless());
        assert_eq!(result.totals.psnr.value(), Some(f64::INFINITY));
    }

    #[test]
    fn test_known_differences() {
        let reference = reference_2x2();
        let test = test_2x2();
        let result = Comparator::new(&reference, &test, &[8]).compare().unwrap();

        let c = result.component(0).unwrap();
        assert_eq!(c.pixel_count, 4);
        assert_eq!(c.mae, 1.5);
        assert_eq!(c.pae, 4.0);
        assert_eq!(c.mse, 5.0);
        assert!((c.rmse - 5f64.sqrt()).abs() < EPSILON);
        assert_eq!(c.me, -1.5);
        assert!(!c.equal);
        assert!((c.psnr - 10.0 * (255.0f64 * 255.0 / 5.0).log10()).abs() < EPSILON);
        assert!((c.psnr_salomon - 10.0 * (256.0f64 * 256.0 / 20.0).log10()).abs() < EPSILON);
        assert_eq!(c.energy, 3000.0);
        assert_eq!(c.variance, 125.0);
        assert!((c.snr - 10.0 * 150f64.log10()).abs() < EPSILON);
        assert!((c.snr_variance - 10.0 * 25f64.log10()).abs() < EPSILON);
        assert!(c.mae <= c.pae);
    }

    #[test]
    fn test_mask_excludes_peak_pixel() {
        let reference = reference_2x2();
        let test = test_2x2();
        let mask = Mask::new(Shape::new(1, 2, 2), vec![1, 1, 1, 0]).unwrap();

        let result = Comparator::new(&reference, &test, &[8])
            .mask(&mask)
            .compare()
            .unwrap();

        let c = result.component(0).unwrap();
        assert_eq!(c.pixel_count, 3);
        assert_eq!(c.pae, 2.0);
        assert!((c.mae - 2.0 / 3.0).abs() < EPSILON);
        assert!((c.mse - 4.0 / 3.0).abs() < EPSILON);
        assert!((c.me + 2.0 / 3.0).abs() < EPSILON);
        assert_eq!(c.energy, 1400.0);
    }

    #[test]
    fn test_masked_pixels_are_inert() {
        let reference = reference_2x2();
        let test = test_2x2();
        let extreme = create_test_raster(&[[[12.0, 20.0], [30.0, 1.0e12]]]);
        let mask = Mask::new(Shape::new(1, 2, 2), vec![1, 1, 1, 0]).unwrap();

        let a = Comparator::new(&reference, &test, &[8])
            .mask(&mask)
            .compare()
            .unwrap();
        let b = Comparator::new(&reference, &extreme, &[8])
            .mask(&mask)
            .compare()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_roi_matches_unweighted() {
        let (reference, test) = create_multi_component();
        let labels = Mask::new(reference.shape(), vec![7; reference.shape().len()]).unwrap();
        let weights = RoiWeights::from_pairs(&[7.0, 1.0]).unwrap();

        let plain = Comparator::new(&reference, &test, &[8]).compare().unwrap();
        let weighted = Comparator::new(&reference, &test, &[8])
            .mask(&labels)
            .roi_weights(&weights)
            .compare()
            .unwrap();

        assert!(weighted.weighted);
        assert_eq!(plain.components, weighted.components);
        assert_eq!(plain.totals, weighted.totals);
    }

    #[test]
    fn test_roi_weights_scale_errors() {
        let reference = reference_2x2();
        let test = test_2x2();
        let labels = Mask::new(Shape::new(1, 2, 2), vec![0, 0, 0, 200]).unwrap();
        let weights = RoiWeights::from_pairs(&[200.0, 0.5, 0.0, 1.0]).unwrap();

        let result = Comparator::new(&reference, &test, &[8])
            .mask(&labels)
            .roi_weights(&weights)
            .compare()
            .unwrap();

        let c = result.component(0).unwrap();
        assert_eq!(c.pixel_count, 4);
        assert_eq!(c.pae, 2.0);
        assert_eq!(c.mse, 2.0);
        // Range uses the table's largest weight: 256 * 1 - 1
        assert_eq!(c.dynamic_range, 255.0);
    }

    #[test]
    fn test_aggregate_sums() {
        let (reference, test) = create_multi_component();
        let result = Comparator::new(&reference, &test, &[8]).compare().unwrap();

        let pixels: u64 = result.active().map(|(_, c)| c.pixel_count).sum();
        let abs_sum: f64 = result.active().map(|(_, c)| c.abs_error_sum).sum();
        let peak = result.active().map(|(_, c)| c.pae).fold(0.0, f64::max);

        assert_eq!(result.active_count(), 3);
        assert_eq!(result.totals.pixel_count, pixels);
        assert_eq!(result.totals.abs_error_sum, abs_sum);
        assert_eq!(result.totals.pae, peak);
        assert!((result.totals.rmse - result.totals.mse.sqrt()).abs() < EPSILON);
        assert!(result.totals.psnr.is_defined());
    }

    #[test]
    fn test_aggregate_formulas() {
        let reference = create_test_raster(&[[[10.0, 20.0], [30.0, 40.0]], [[1.0, 2.0], [3.0, 4.0]]]);
        let test = create_test_raster(&[[[12.0, 20.0], [30.0, 44.0]], [[1.0, 2.0], [3.0, 5.0]]]);
        let result = Comparator::new(&reference, &test, &[8]).compare().unwrap();
        let totals = &result.totals;

        assert_eq!(totals.pixel_count, 8);
        assert_eq!(totals.mae, 0.875);
        assert_eq!(totals.pae, 4.0);
        assert_eq!(totals.mse, 2.625);
        assert_eq!(totals.me, -0.875);
        assert_eq!(totals.energy, 3030.0);
        assert!((totals.variance - 189.6875).abs() < EPSILON);
        assert!((totals.rmse - 2.625f64.sqrt()).abs() < EPSILON);
        assert!((totals.snr - 10.0 * (3030.0f64 / 21.0).log10()).abs() < EPSILON);
        assert!((totals.snr_variance - 10.0 * (189.6875f64 / 2.625).log10()).abs() < EPSILON);

        let psnr = totals.psnr.value().unwrap();
        assert!((psnr - 10.0 * (255.0f64 * 255.0 / 2.625).log10()).abs() < EPSILON);
        let salomon = totals.psnr_salomon.value().unwrap();
        assert!((salomon - 10.0 * (256.0f64 * 256.0 / (4.0 * 2.625)).log10()).abs() < EPSILON);
        assert!(!totals.equal);
    }

    #[test]
    fn test_aggregate_variance_uses_global_mean() {
        let reference = create_test_raster(&[[[0.0, 0.0], [0.0, 0.0]], [[2.0, 2.0], [2.0, 2.0]]]);
        let result = Comparator::new(&reference, &reference, &[8])
            .compare()
            .unwrap();

        assert_eq!(result.component(0).unwrap().variance, 0.0);
        assert_eq!(result.component(1).unwrap().variance, 0.0);
        assert_eq!(result.totals.variance, 1.0);
        assert_eq!(result.totals.energy, 16.0);
    }

    #[test]
    fn test_single_component_matches_all() {
        let (reference, test) = create_multi_component();
        let mask = Mask::new(
            reference.shape(),
            vec![1, 0, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1],
        )
        .unwrap();

        let all = Comparator::new(&reference, &test, &[8])
            .mask(&mask)
            .compare()
            .unwrap();

        let single_test = Raster::new(Shape::new(1, 2, 2), test.plane(1).to_vec()).unwrap();
        let single_mask = Mask::new(Shape::new(1, 2, 2), mask.plane(1).to_vec()).unwrap();
        let single = Comparator::new(&reference, &single_test, &[8])
            .component(ComponentSelection::Single(1))
            .mask(&single_mask)
            .compare()
            .unwrap();

        assert_eq!(single.active_count(), 1);
        assert!(single.component(0).is_none());
        assert_eq!(single.component(1), all.component(1));
    }

    #[test]
    fn test_mixed_ranges_leave_totals_undefined() {
        let (reference, test) = create_multi_component();
        let result = Comparator::new(&reference, &test, &[8, 16])
            .compare()
            .unwrap();

        assert_eq!(result.totals.psnr, AggregatePsnr::MixedRange);
        assert_eq!(result.totals.psnr_salomon, AggregatePsnr::MixedRange);
        assert_eq!(result.component(2).unwrap().dynamic_range, 65535.0);
        assert!(result.totals.mse > 0.0);

        let single = Comparator::new(&reference, &test, &[8, 16])
            .component(ComponentSelection::Single(0))
            .compare()
            .unwrap();
        assert!(single.totals.psnr.is_defined());
    }

    #[test]
    fn test_higher_bit_depth_raises_psnr() {
        let reference = reference_2x2();
        let test = test_2x2();
        let low = Comparator::new(&reference, &test, &[8]).compare().unwrap();
        let high = Comparator::new(&reference, &test, &[16]).compare().unwrap();

        let low = low.component(0).unwrap();
        let high = high.component(0).unwrap();
        assert_eq!(low.mse, high.mse);
        assert!(high.psnr > low.psnr);
        assert!(high.psnr_salomon > low.psnr_salomon);
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let (reference, test) = create_multi_component();
        let one = Comparator::new(&reference, &test, &[8])
            .threads(1)
            .compare()
            .unwrap();
        let many = Comparator::new(&reference, &test, &[8])
            .threads(4)
            .compare()
            .unwrap();
        assert_eq!(one, many);
    }

    #[test]
    fn test_precision_advisory_for_huge_values() {
        let reference = create_test_raster(&[[[1.0e9, 1.0e9], [1.0e9, 1.0e9]]]);
        let test = create_test_raster(&[[[0.0, 0.0], [0.0, 0.0]]]);
        let result = Comparator::new(&reference, &test, &[32])
            .compare()
            .unwrap();

        let advisory = result.precision.unwrap();
        assert!(advisory.missing_bits > 0);
        // Observed range is 2^31 - 1; the nominal 32-bit range would need 66 bits.
        assert_eq!(advisory.required_bits, 64);
        assert!(!advisory.per_component_exact);

        let small = Comparator::new(&reference_2x2(), &test_2x2(), &[8])
            .compare()
            .unwrap();
        assert!(small.precision.is_none());
    }

    #[test]
    fn test_requested_metrics_recorded() {
        let reference = reference_2x2();
        let result = Comparator::new(&reference, &reference, &[8])
            .metrics(MetricSelection::Only(Metric::Psnr))
            .inverted(true)
            .compare()
            .unwrap();
        assert_eq!(result.requested, MetricSelection::Only(Metric::Psnr));
        assert!(result.mask_inverted);
    }

    #[test]
    fn test_validation_errors() {
        let reference = reference_2x2();
        let (multi, _) = create_multi_component();

        // Shape mismatch when comparing all components
        assert!(Comparator::new(&multi, &reference, &[8]).compare().is_err());

        // Mask shape mismatch
        let mask = Mask::new(Shape::new(1, 1, 4), vec![1; 4]).unwrap();
        assert!(matches!(
            Comparator::new(&reference, &reference, &[8])
                .mask(&mask)
                .compare(),
            Err(CompareError::Mask(_))
        ));

        // Component out of range
        assert!(matches!(
            Comparator::new(&multi, &reference, &[8])
                .component(ComponentSelection::Single(3))
                .compare(),
            Err(CompareError::Component(_))
        ));

        // Negative bit depth
        assert!(matches!(
            Comparator::new(&reference, &reference, &[-8]).compare(),
            Err(CompareError::BitDepth(_))
        ));

        // ROI weights without labels
        let weights = RoiWeights::from_pairs(&[1.0, 2.0]).unwrap();
        assert!(Comparator::new(&reference, &reference, &[8])
            .roi_weights(&weights)
            .compare()
            .is_err());
    }

    #[test]
    #[allow(deprecated)]
    fn test_precomputed_moments_ignored() {
        let reference = reference_2x2();
        let test = test_2x2();
        let plain = Comparator::new(&reference, &test, &[8]).compare().unwrap();
        let overridden = Comparator::new(&reference, &test, &[8])
            .precomputed_moments(&[1.0], &[2.0])
            .compare()
            .unwrap();
        assert_eq!(plain, overridden);
    }
}
