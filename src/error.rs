//! Error types for UPI QR operations

use crate::link::ValidationError;
use thiserror::Error;

/// Result type alias using upiqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for upiqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier/amount pair rejected before encoding
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Rasterization or PNG encoding failed
    #[error("Image processing error: {0}")]
    Image(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Clipboard write failed or no clipboard backend is available
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Platform share failed
    #[error("Share failed: {0}")]
    Share(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}
