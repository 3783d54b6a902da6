//! Image and mask loading.
//!
//! Visual formats (PNG, PNM, TIFF, BMP, GIF, JPEG, ...) are decoded with the
//! `image` crate, one component per channel. Files with a raw extension are
//! read as band-sequential samples described by a [`RawGeometry`].

mod raw;

pub use raw::{decode_raw, read_raw, Endianness, RawGeometry, SampleType};

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Pixel};

use crate::error::{CompareError, Result};
use crate::raster::{Mask, Raster, Shape};

/// File extensions read as raw samples.
pub const RAW_EXTENSIONS: &[&str] = &["raw", "rawl", "img"];

/// A decoded image with its nominal per-component bit depth.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Decoded samples.
    pub raster: Raster,
    /// Nominal bit depth of each component.
    pub bit_depths: Vec<u32>,
}

/// How a mask file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// Non-zero samples are included.
    Inclusion,
    /// Samples are ROI labels.
    Labels,
}

/// Whether a path names a raw sample file.
pub fn is_raw<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| RAW_EXTENSIONS.iter().any(|r| e.eq_ignore_ascii_case(r)))
        .unwrap_or(false)
}

/// Load an image, using `geometry` for raw files.
///
/// # Errors
///
/// Returns an error if a raw file has no geometry, the file cannot be read,
/// or the format cannot be decoded.
pub fn load_image<P: AsRef<Path>>(path: P, geometry: Option<&RawGeometry>) -> Result<LoadedImage> {
    let path = path.as_ref();
    log::debug!("Loading image: {}", path.display());

    if is_raw(path) {
        let geometry = geometry.ok_or_else(|| {
            CompareError::InvalidArgument(format!(
                "raw file {} requires its geometry",
                path.display()
            ))
        })?;
        let raster = read_raw(path, geometry)?;
        let bit_depths = vec![geometry.sample_type.bit_depth(); geometry.components];
        return Ok(LoadedImage { raster, bit_depths });
    }

    let image = image::open(path)?;
    from_dynamic(&image)
}

/// Convert a decoded image into a raster.
pub fn from_dynamic(image: &DynamicImage) -> Result<LoadedImage> {
    let (raster, bits) = match image {
        DynamicImage::ImageLuma8(buf) => (raster_from_buffer(buf)?, 8),
        DynamicImage::ImageLumaA8(buf) => (raster_from_buffer(buf)?, 8),
        DynamicImage::ImageRgb8(buf) => (raster_from_buffer(buf)?, 8),
        DynamicImage::ImageRgba8(buf) => (raster_from_buffer(buf)?, 8),
        DynamicImage::ImageLuma16(buf) => (raster_from_buffer(buf)?, 16),
        DynamicImage::ImageLumaA16(buf) => (raster_from_buffer(buf)?, 16),
        DynamicImage::ImageRgb16(buf) => (raster_from_buffer(buf)?, 16),
        DynamicImage::ImageRgba16(buf) => (raster_from_buffer(buf)?, 16),
        DynamicImage::ImageRgb32F(buf) => (raster_from_buffer(buf)?, 32),
        DynamicImage::ImageRgba32F(buf) => (raster_from_buffer(buf)?, 32),
        other => (raster_from_buffer(&other.to_rgba32f())?, 32),
    };
    let bit_depths = vec![bits; raster.components()];
    Ok(LoadedImage { raster, bit_depths })
}

fn raster_from_buffer<P>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> Result<Raster>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let (width, height) = buffer.dimensions();
    let (width, height) = (width as usize, height as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let plane_len = width * height;

    let mut samples = vec![0.0; channels * plane_len];
    for (x, y, pixel) in buffer.enumerate_pixels() {
        let offset = y as usize * width + x as usize;
        for (c, &value) in pixel.channels().iter().enumerate() {
            samples[c * plane_len + offset] = value.into();
        }
    }

    Raster::new(Shape::new(channels, height, width), samples)
}

/// Load a mask file.
///
/// Raw masks are read as unsigned bytes with `shape`.
pub fn load_mask<P: AsRef<Path>>(path: P, kind: MaskKind, shape: Option<Shape>) -> Result<Mask> {
    let path = path.as_ref();
    let geometry = shape.map(|s| RawGeometry {
        components: s.components,
        height: s.height,
        width: s.width,
        sample_type: SampleType::U8,
        byte_order: Endianness::Big,
    });
    let loaded = load_image(path, geometry.as_ref())?;

    Ok(match kind {
        MaskKind::Inclusion => Mask::flags_from_raster(&loaded.raster),
        MaskKind::Labels => Mask::labels_from_raster(&loaded.raster),
    })
}
