//! Error types for halftone operations

use thiserror::Error;

/// Result type for halftone operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during compression/decompression
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Invalid bitstream: {0}")]
    InvalidBitstream(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Symbol {0} has no code in the code table")]
    UnknownSymbol(i32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
