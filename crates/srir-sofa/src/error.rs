//! Error types for the container crate.

use thiserror::Error;

/// Errors that can occur when writing or reading SRIR container files.
#[derive(Error, Debug)]
pub enum SofaError {
    #[error("invalid magic bytes: expected SRIR (0x53524952)")]
    InvalidMagic,

    #[error("unsupported container version: {0}")]
    UnsupportedVersion(u16),

    /// A tensor or position array does not match the declared dimensions.
    /// Raised before any file is touched.
    #[error("shape mismatch for {variable}: expected {expected}, got {got}")]
    ShapeMismatch {
        variable: String,
        expected: String,
        got: String,
    },

    #[error("record checksum mismatch for record {index}")]
    ChecksumMismatch { index: usize },

    #[error("invalid offset: record at {offset} (+{size} bytes) exceeds file size {file_size}")]
    InvalidOffset {
        offset: u64,
        size: u64,
        file_size: u64,
    },

    #[error("invalid record type: {0:#04x}")]
    InvalidRecordType(u8),

    #[error("invalid dimension id: {0:#04x}")]
    InvalidDimensionId(u8),

    #[error("variable not found: {0}")]
    VariableNotFound(String),

    #[error("invalid UTF-8 in record name or attribute: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for container operations.
pub type Result<T> = std::result::Result<T, SofaError>;
