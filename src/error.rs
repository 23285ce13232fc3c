//! Error types for QR generation and export

use thiserror::Error;

/// Result type alias for qrgenius operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or exporting a QR code
#[derive(Error, Debug)]
pub enum Error {
    /// The text does not fit in a version 40 symbol at the chosen level
    #[error("Data too long: {len} bytes exceed the symbol capacity")]
    DataTooLong { len: usize },

    /// The encoder rejected the input for another reason
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Raster encoding or decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A data URL could not be parsed
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// A color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An option value could not be parsed
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The canvas has nothing drawn on it yet
    #[error("Canvas is blank")]
    BlankCanvas,

    /// A host capability (clipboard, download, object URL) failed
    #[error("Capability failed: {0}")]
    Capability(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
