//! Error types for the image compressor.
//!
//! One flat `thiserror` enum covers the whole crate; helper constructors
//! keep call sites short.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Main error type for the compressor.
///
/// All errors in the crate are converted to this type before being
/// returned to callers.
#[derive(Error, Debug, Serialize)]
pub enum CompressorError {
    /// Source payload could not be decoded as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Re-encoding the image failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Request or configuration validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pipeline failure outside codec work
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),
}

/// Convenience result type for compressor operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

// Helper methods for error creation
impl CompressorError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }
}

// Convert std::io::Error to CompressorError
impl From<io::Error> for CompressorError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}
