//! Raw band-sequential sample files.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::raster::{Raster, Shape};

/// Sample encoding of a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    /// One byte per sample, non-zero is 1.
    Boolean,
    /// Unsigned 8-bit.
    U8,
    /// Unsigned 16-bit.
    U16,
    /// Signed 16-bit.
    I16,
    /// Signed 32-bit.
    I32,
    /// Signed 64-bit.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl SampleType {
    /// Parse the numeric type code used on the command line (0..=7).
    pub fn from_code(code: u32) -> Result<Self> {
        Ok(match code {
            0 => SampleType::Boolean,
            1 => SampleType::U8,
            2 => SampleType::U16,
            3 => SampleType::I16,
            4 => SampleType::I32,
            5 => SampleType::I64,
            6 => SampleType::F32,
            7 => SampleType::F64,
            _ => {
                return Err(CompareError::InvalidArgument(format!(
                    "raw sample type must be between 0 and 7, got {}",
                    code
                )))
            }
        })
    }

    /// Bytes per sample.
    pub fn bytes(&self) -> usize {
        match self {
            SampleType::Boolean | SampleType::U8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::I32 | SampleType::F32 => 4,
            SampleType::I64 | SampleType::F64 => 8,
        }
    }

    /// Nominal bit depth of the sample type.
    pub fn bit_depth(&self) -> u32 {
        match self {
            SampleType::Boolean => 1,
            other => other.bytes() as u32 * 8,
        }
    }
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl Endianness {
    /// Parse the numeric byte order code (0 big endian, 1 little endian).
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Endianness::Big),
            1 => Ok(Endianness::Little),
            _ => Err(CompareError::InvalidArgument(format!(
                "raw byte order must be 0 or 1, got {}",
                code
            ))),
        }
    }
}

/// Layout of a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGeometry {
    /// Number of components.
    pub components: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
    /// Sample encoding.
    pub sample_type: SampleType,
    /// Byte order.
    pub byte_order: Endianness,
}

impl RawGeometry {
    /// Parse `zSize ySize xSize sampleType byteOrder`.
    pub fn from_values(values: &[u32]) -> Result<Self> {
        let [z, y, x, sample_type, byte_order] = values else {
            return Err(CompareError::InvalidArgument(format!(
                "raw geometry needs 5 values (zSize ySize xSize sampleType byteOrder), got {}",
                values.len()
            )));
        };
        if *z == 0 || *y == 0 || *x == 0 {
            return Err(CompareError::InvalidArgument(
                "raw image dimensions must be positive".into(),
            ));
        }

        Ok(Self {
            components: *z as usize,
            height: *y as usize,
            width: *x as usize,
            sample_type: SampleType::from_code(*sample_type)?,
            byte_order: Endianness::from_code(*byte_order)?,
        })
    }

    /// Raster shape described by the geometry.
    pub fn shape(&self) -> Shape {
        Shape::new(self.components, self.height, self.width)
    }

    /// Expected file size in bytes.
    pub fn byte_len(&self) -> usize {
        self.shape().len() * self.sample_type.bytes()
    }
}

/// Read a raw file.
pub fn read_raw<P: AsRef<Path>>(path: P, geometry: &RawGeometry) -> Result<Raster> {
    let bytes = fs::read(path.as_ref())?;
    decode_raw(&bytes, geometry)
}

/// Decode raw bytes.
pub fn decode_raw(bytes: &[u8], geometry: &RawGeometry) -> Result<Raster> {
    if bytes.len() != geometry.byte_len() {
        return Err(CompareError::RawFormat(format!(
            "expected {} bytes for {} samples of {:?}, got {}",
            geometry.byte_len(),
            geometry.shape(),
            geometry.sample_type,
            bytes.len()
        )));
    }

    let count = geometry.shape().len();
    let mut reader = Cursor::new(bytes);
    let samples = match geometry.byte_order {
        Endianness::Big => read_samples::<BigEndian, _>(&mut reader, geometry.sample_type, count)?,
        Endianness::Little => {
            read_samples::<LittleEndian, _>(&mut reader, geometry.sample_type, count)?
        }
    };

    Raster::new(geometry.shape(), samples)
}

fn read_samples<B: ByteOrder, R: Read>(
    reader: &mut R,
    sample_type: SampleType,
    count: usize,
) -> Result<Vec<f64>> {
    let mut samples = Vec::with_capacity(count);
    for _ in 0..count {
        let value = match sample_type {
            SampleType::Boolean => {
                if reader.read_u8()? != 0 {
                    1.0
                } else {
                    0.0
                }
            }
            SampleType::U8 => reader.read_u8()? as f64,
            SampleType::U16 => reader.read_u16::<B>()? as f64,
            SampleType::I16 => reader.read_i16::<B>()? as f64,
            SampleType::I32 => reader.read_i32::<B>()? as f64,
            SampleType::I64 => reader.read_i64::<B>()? as f64,
            SampleType::F32 => reader.read_f32::<B>()? as f64,
            SampleType::F64 => reader.read_f64::<B>()?,
        };
        samples.push(value);
    }
    Ok(samples)
}
