//! Per-component accumulators.
//!
//! Each pass over a component plane fills a small accumulator owned by that
//! pass. Accumulation inside a plane is sequential in row-major order; totals
//! across components are formed by [`merge`](ErrorAccumulator::merge) calls in
//! ascending component order, so results do not depend on how components were
//! scheduled across threads.

/// How mask values are interpreted for one plane.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Weighting<'a> {
    /// Every pixel is included with weight 1.
    Unmasked,
    /// Only pixels flagged [`Mask::INCLUDED`](crate::raster::Mask::INCLUDED) are included.
    Inclusion(&'a [u8]),
    /// Every pixel is included; the difference is scaled by the weight of its label.
    /// Counting the whole plane keeps a table of unit weights equal to an unmasked run.
    Roi {
        labels: &'a [u8],
        weights: &'a [f64; 256],
    },
}

/// Borrowed view of the samples compared for one component.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneView<'a> {
    pub reference: &'a [f64],
    pub test: &'a [f64],
    pub weighting: Weighting<'a>,
}

impl<'a> PlaneView<'a> {
    fn included(&self, idx: usize) -> bool {
        match self.weighting {
            Weighting::Inclusion(flags) => flags[idx] == crate::raster::Mask::INCLUDED,
            Weighting::Unmasked | Weighting::Roi { .. } => true,
        }
    }

    /// Number of pixels taking part in the statistics.
    pub fn pixel_count(&self) -> u64 {
        match self.weighting {
            Weighting::Inclusion(flags) => flags
                .iter()
                .filter(|&&v| v == crate::raster::Mask::INCLUDED)
                .count() as u64,
            Weighting::Unmasked | Weighting::Roi { .. } => self.reference.len() as u64,
        }
    }

    /// Weighted difference `reference - test` at `idx`; zero when excluded.
    fn difference(&self, idx: usize) -> f64 {
        match self.weighting {
            Weighting::Unmasked => self.reference[idx] - self.test[idx],
            Weighting::Inclusion(flags) => {
                if flags[idx] == crate::raster::Mask::INCLUDED {
                    self.reference[idx] - self.test[idx]
                } else {
                    0.0
                }
            }
            Weighting::Roi { labels, weights } => {
                (self.reference[idx] - self.test[idx]) * weights[labels[idx] as usize]
            }
        }
    }

    /// First pass: sum and sum of squares of included reference samples.
    pub fn moments(&self) -> Moments {
        let mut moments = Moments::default();
        for (idx, &value) in self.reference.iter().enumerate() {
            if self.included(idx) {
                moments.sum += value;
                moments.squared_sum += value * value;
            }
        }
        moments
    }

    /// Second pass: squared deviations from the component mean and from the
    /// mean over all active components.
    pub fn deviations(&self, mean: f64, global_mean: f64) -> Deviations {
        let mut deviations = Deviations::default();
        for (idx, &value) in self.reference.iter().enumerate() {
            if self.included(idx) {
                let own = value - mean;
                deviations.own += own * own;
                let global = value - global_mean;
                deviations.global += global * global;
            }
        }
        deviations
    }

    /// Error statistics over the plane.
    pub fn errors(&self) -> ErrorAccumulator {
        let mut acc = ErrorAccumulator::new();
        for idx in 0..self.reference.len() {
            acc.push(self.difference(idx));
        }
        acc
    }
}

/// First-order and second-order sums of reference samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Moments {
    pub sum: f64,
    pub squared_sum: f64,
}

/// Sums of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Deviations {
    /// Around the component's own mean.
    pub own: f64,
    /// Around the mean of all active components.
    pub global: f64,
}

/// Absolute, squared and signed error sums with the peak absolute error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ErrorAccumulator {
    pub abs_sum: f64,
    pub peak: f64,
    pub squared_sum: f64,
    pub signed_sum: f64,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self {
            abs_sum: 0.0,
            peak: f64::NEG_INFINITY,
            squared_sum: 0.0,
            signed_sum: 0.0,
        }
    }

    pub fn push(&mut self, error: f64) {
        let abs = error.abs();
        self.abs_sum += abs;
        self.peak = self.peak.max(abs);
        self.squared_sum += error * error;
        self.signed_sum += error;
    }

    pub fn merge(&mut self, other: &ErrorAccumulator) {
        self.abs_sum += other.abs_sum;
        self.peak = self.peak.max(other.peak);
        self.squared_sum += other.squared_sum;
        self.signed_sum += other.signed_sum;
    }
}

impl Default for ErrorAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: [f64; 4] = [10.0, 20.0, 30.0, 40.0];
    const TEST: [f64; 4] = [12.0, 20.0, 30.0, 44.0];

    #[test]
    fn test_unmasked_errors() {
        let view = PlaneView {
            reference: &REFERENCE,
            test: &TEST,
            weighting: Weighting::Unmasked,
        };
        let errors = view.errors();
        assert_eq!(view.pixel_count(), 4);
        assert_eq!(errors.abs_sum, 6.0);
        assert_eq!(errors.peak, 4.0);
        assert_eq!(errors.squared_sum, 20.0);
        assert_eq!(errors.signed_sum, -6.0);
    }

    #[test]
    fn test_inclusion_mask_skips_pixels() {
        let flags = [1, 1, 1, 0];
        let view = PlaneView {
            reference: &REFERENCE,
            test: &TEST,
            weighting: Weighting::Inclusion(&flags),
        };
        assert_eq!(view.pixel_count(), 3);
        assert_eq!(view.errors().peak, 2.0);

        let moments = view.moments();
        assert_eq!(moments.sum, 60.0);
        assert_eq!(moments.squared_sum, 1400.0);
    }

    #[test]
    fn test_roi_weighting_scales_differences() {
        let labels = [0, 0, 0, 9];
        let mut weights = [1.0; 256];
        weights[9] = 0.5;
        let view = PlaneView {
            reference: &REFERENCE,
            test: &TEST,
            weighting: Weighting::Roi {
                labels: &labels,
                weights: &weights,
            },
        };
        let errors = view.errors();
        assert_eq!(view.pixel_count(), 4);
        assert_eq!(errors.peak, 2.0);
        assert_eq!(errors.squared_sum, 8.0);
    }

    #[test]
    fn test_deviations() {
        let view = PlaneView {
            reference: &REFERENCE,
            test: &TEST,
            weighting: Weighting::Unmasked,
        };
        let deviations = view.deviations(25.0, 20.0);
        assert_eq!(deviations.own, 500.0);
        assert_eq!(deviations.global, 600.0);
    }

    #[test]
    fn test_merge() {
        let mut a = ErrorAccumulator::new();
        a.push(-3.0);
        let mut b = ErrorAccumulator::new();
        b.push(1.0);
        b.push(2.0);
        a.merge(&b);
        assert_eq!(a.abs_sum, 6.0);
        assert_eq!(a.peak, 3.0);
        assert_eq!(a.squared_sum, 14.0);
        assert_eq!(a.signed_sum, 0.0);
    }
}
