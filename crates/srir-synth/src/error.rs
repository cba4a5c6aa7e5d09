//! Error types for the synthesis crate.

use srir_spatial::SpatialError;
use thiserror::Error;

/// Errors that can occur while converting geometry to delays and
/// assembling the multi-channel response.
#[derive(Error, Debug)]
pub enum SynthError {
    /// Malformed geometric input — a negative distance, a negative
    /// propagation time, or an unusable speed of sound.
    #[error("invalid geometry: {reason} (got {value})")]
    InvalidGeometry {
        /// The violated precondition.
        reason: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An argument outside its documented domain — a negative delay or a
    /// zero sampling rate.
    #[error("invalid argument: {reason} (got {value})")]
    InvalidArgument {
        /// The violated precondition.
        reason: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An input sequence that must be non-empty was empty.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Geometry construction failure propagated from the spatial crate.
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

/// Convenience Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;
