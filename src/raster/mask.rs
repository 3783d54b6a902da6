//! Pixel masks.
//!
//! A mask holds one byte per pixel. Used as an inclusion mask, a value of
//! [`Mask::INCLUDED`] marks a pixel that takes part in the comparison and any
//! other value excludes it. Used together with an ROI weight table, the byte
//! is a label (0..=255) that selects the weight applied to the pixel.

use super::{Raster, Shape};
use crate::error::{CompareError, Result};

/// Per-pixel inclusion flags or ROI labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    shape: Shape,
    values: Vec<u8>,
}

impl Mask {
    /// Inclusion flag value.
    pub const INCLUDED: u8 = 1;

    /// Exclusion flag value produced by mask builders.
    pub const EXCLUDED: u8 = 0;

    /// Create a mask from band-sequential values.
    pub fn new(shape: Shape, values: Vec<u8>) -> Result<Self> {
        if shape.is_empty() {
            return Err(CompareError::Mask(format!(
                "mask dimensions must be positive, got {}",
                shape
            )));
        }
        if values.len() != shape.len() {
            return Err(CompareError::Mask(format!(
                "expected {} values for {}, got {}",
                shape.len(),
                shape,
                values.len()
            )));
        }
        Ok(Self { shape, values })
    }

    /// Inclusion mask from a raster: every non-zero sample is included.
    pub fn flags_from_raster(raster: &Raster) -> Self {
        let values = raster
            .samples()
            .iter()
            .map(|&v| if v != 0.0 { Self::INCLUDED } else { Self::EXCLUDED })
            .collect();
        Self {
            shape: raster.shape(),
            values,
        }
    }

    /// ROI label mask from a raster: samples are clamped to 0..=255.
    pub fn labels_from_raster(raster: &Raster) -> Self {
        let values = raster
            .samples()
            .iter()
            .map(|&v| v.clamp(0.0, 255.0) as u8)
            .collect();
        Self {
            shape: raster.shape(),
            values,
        }
    }

    /// Inclusion mask that excludes every reference sample equal to one of
    /// the given no-data values.
    pub fn from_no_data(reference: &Raster, no_data: &[f64]) -> Self {
        let values = reference
            .samples()
            .iter()
            .map(|v| {
                if no_data.contains(v) {
                    Self::EXCLUDED
                } else {
                    Self::INCLUDED
                }
            })
            .collect();
        Self {
            shape: reference.shape(),
            values,
        }
    }

    /// Mask shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// All values in band-sequential order.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Values of one component plane.
    pub fn plane(&self, z: usize) -> &[u8] {
        let len = self.shape.plane_len();
        &self.values[z * len..(z + 1) * len]
    }

    /// Swap included and excluded pixels of an inclusion mask.
    pub fn invert_flags(&mut self) {
        for v in &mut self.values {
            *v = if *v == Self::EXCLUDED {
                Self::INCLUDED
            } else {
                Self::EXCLUDED
            };
        }
    }

    /// Invert an ROI label mask: background (label 0) becomes label 255,
    /// every other label becomes background.
    pub fn invert_labels(&mut self) {
        for v in &mut self.values {
            *v = if *v == 0 { u8::MAX } else { 0 };
        }
    }

    /// Replicate a single-component mask across `components` planes.
    ///
    /// A mask that already has `components` planes is returned unchanged.
    pub fn broadcast(self, components: usize) -> Result<Self> {
        if self.shape.components == components {
            return Ok(self);
        }
        if self.shape.components != 1 {
            return Err(CompareError::Mask(format!(
                "cannot broadcast a {}-component mask to {} components",
                self.shape.components, components
            )));
        }

        let shape = Shape::new(components, self.shape.height, self.shape.width);
        let values = self.values.repeat(components);
        Ok(Self { shape, values })
    }
}
