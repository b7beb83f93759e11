//! Custom error types for maker-block decoding

use std::fmt;
use std::io;

/// Maker-block specific error types
///
/// Only directory parsing can fail hard; every variant besides
/// `MalformedInput` means the embedded directory was malformed. The
/// scanning stages degrade to empty output instead of erroring.
#[derive(Debug)]
pub enum MakerError {
    /// I/O error from the underlying reader
    IoError(io::Error),
    /// Input bytes could not be recovered from their captured form
    MalformedInput(String),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Directory magic number was not 42
    InvalidMagic(u16),
    /// Too few bytes for a directory header
    TruncatedHeader(usize),
}

impl fmt::Display for MakerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakerError::IoError(e) => write!(f, "I/O error: {}", e),
            MakerError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            MakerError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            MakerError::InvalidMagic(v) => write!(f, "Invalid directory magic number: {}", v),
            MakerError::TruncatedHeader(len) => {
                write!(f, "Insufficient data for directory header: {} bytes", len)
            }
        }
    }
}

impl std::error::Error for MakerError {}

impl From<io::Error> for MakerError {
    fn from(error: io::Error) -> Self {
        MakerError::IoError(error)
    }
}

/// Result type for maker-block operations
pub type MakerResult<T> = Result<T, MakerError>;
