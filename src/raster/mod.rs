//! In-memory rasters.
//!
//! A [`Raster`] stores real-valued samples in band-sequential order, indexed
//! by `(component, row, column)`. Every sample is held as `f64` regardless of
//! the width it was decoded from.

pub mod mask;

pub use mask::Mask;

use serde::Serialize;

use crate::error::{CompareError, Result};

/// Dimensions of a raster or mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    /// Number of components (`zSize`).
    pub components: usize,
    /// Number of rows (`ySize`).
    pub height: usize,
    /// Number of columns (`xSize`).
    pub width: usize,
}

impl Shape {
    /// Create a new shape.
    pub fn new(components: usize, height: usize, width: usize) -> Self {
        Self {
            components,
            height,
            width,
        }
    }

    /// Number of samples in one component plane.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.components * self.plane_len()
    }

    /// Whether the shape holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two shapes agree on rows and columns.
    pub fn same_plane(&self, other: &Shape) -> bool {
        self.height == other.height && self.width == other.width
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.components, self.height, self.width)
    }
}

/// Multi-component raster of real-valued samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    shape: Shape,
    samples: Vec<f64>,
}

impl Raster {
    /// Create a raster from band-sequential samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape has a zero dimension or if `samples`
    /// does not hold exactly `components * height * width` values.
    pub fn new(shape: Shape, samples: Vec<f64>) -> Result<Self> {
        if shape.is_empty() {
            return Err(CompareError::Shape(format!(
                "raster dimensions must be positive, got {}",
                shape
            )));
        }
        if samples.len() != shape.len() {
            return Err(CompareError::Shape(format!(
                "expected {} samples for {}, got {}",
                shape.len(),
                shape,
                samples.len()
            )));
        }
        Ok(Self { shape, samples })
    }

    /// Create a raster from nested `[z][y][x]` planes.
    pub fn from_planes(planes: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let components = planes.len();
        let height = planes.first().map_or(0, |p| p.len());
        let width = planes
            .first()
            .and_then(|p| p.first())
            .map_or(0, |row| row.len());

        let mut samples = Vec::with_capacity(components * height * width);
        for (z, plane) in planes.into_iter().enumerate() {
            if plane.len() != height {
                return Err(CompareError::Shape(format!(
                    "component {} has {} rows, expected {}",
                    z,
                    plane.len(),
                    height
                )));
            }
            for (y, row) in plane.into_iter().enumerate() {
                if row.len() != width {
                    return Err(CompareError::Shape(format!(
                        "component {} row {} has {} columns, expected {}",
                        z,
                        y,
                        row.len(),
                        width
                    )));
                }
                samples.extend(row);
            }
        }

        Self::new(Shape::new(components, height, width), samples)
    }

    /// Raster shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of components.
    pub fn components(&self) -> usize {
        self.shape.components
    }

    /// All samples in band-sequential order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Samples of a single component plane in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `z` is not a valid component index.
    pub fn plane(&self, z: usize) -> &[f64] {
        let len = self.shape.plane_len();
        &self.samples[z * len..(z + 1) * len]
    }

    /// Minimum and maximum sample of one component.
    pub fn plane_extent(&self, z: usize) -> (f64, f64) {
        self.plane(z)
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_indexing() {
        let raster = Raster::from_planes(vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        ])
        .unwrap();

        assert_eq!(raster.shape(), Shape::new(2, 2, 2));
        assert_eq!(raster.plane(0)[2], 3.0);
        assert_eq!(raster.samples()[5], 6.0);
        assert_eq!(raster.plane(1), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_raster_rejects_bad_sample_count() {
        assert!(Raster::new(Shape::new(1, 2, 2), vec![0.0; 3]).is_err());
        assert!(Raster::new(Shape::new(0, 2, 2), vec![]).is_err());
    }

    #[test]
    fn test_raster_rejects_ragged_planes() {
        let result = Raster::from_planes(vec![vec![vec![1.0, 2.0], vec![3.0]]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plane_extent() {
        let raster = Raster::from_planes(vec![vec![vec![-3.0, 7.0], vec![0.5, 2.0]]]).unwrap();
        assert_eq!(raster.plane_extent(0), (-3.0, 7.0));
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(Shape::new(3, 480, 640).to_string(), "3x480x640");
    }
}
