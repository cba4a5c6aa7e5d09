//! Error types for the geometry crate.

use thiserror::Error;

/// Errors that can occur when constructing or combining geometry inputs.
#[derive(Error, Debug)]
pub enum SpatialError {
    /// Radius of a spherical point is negative.
    #[error("invalid radius {0}: must be >= 0")]
    InvalidRadius(f64),

    /// A coordinate is NaN or infinite.
    #[error("non-finite {component} coordinate: {value}")]
    NonFiniteCoordinate {
        /// Which component was rejected ("x", "radius", "azimuth", ...).
        component: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Convenience Result type for geometry operations.
pub type Result<T> = std::result::Result<T, SpatialError>;
