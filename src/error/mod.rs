//! Error types for the raster comparison library.

use thiserror::Error;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Main error type for the raster comparison library.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Reference and test rasters cannot be compared.
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// Mask does not fit the rasters being compared.
    #[error("Mask error: {0}")]
    Mask(String),

    /// Component selector outside the reference raster.
    #[error("Component error: {0}")]
    Component(String),

    /// Negative or missing pixel bit depth.
    #[error("Bit depth error: {0}")]
    BitDepth(String),

    /// A mask was defined both explicitly and from no-data values.
    #[error("Mask conflict: {0}")]
    MaskConflict(String),

    /// Malformed ROI weight table.
    #[error("ROI weight table error: {0}")]
    RoiTable(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raw sample file does not match its declared geometry.
    #[error("Raw format error: {0}")]
    RawFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error decoding an image file.
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Error parsing a TOML configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error serializing a report.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompareError {
    /// Process exit code reported by the command-line tool for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CompareError::InvalidArgument(_)
            | CompareError::Config(_)
            | CompareError::Toml(_)
            | CompareError::BitDepth(_)
            | CompareError::RoiTable(_) => 2,
            CompareError::Io(_) | CompareError::Decode(_) | CompareError::RawFormat(_) => 3,
            CompareError::Shape(_)
            | CompareError::Mask(_)
            | CompareError::Component(_)
            | CompareError::Json(_)
            | CompareError::Internal(_) => 4,
            CompareError::MaskConflict(_) => 5,
        }
    }
}
