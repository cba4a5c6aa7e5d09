//! # srir-spatial — receiver and source geometry
//!
//! Position types and distance functions for spatial room impulse response
//! synthesis. Supports two coordinate conventions:
//!
//! - **[`CartesianPoint`]**: x/y/z in metres — the convention used for
//!   receiver arrays and source placements throughout the workspace.
//! - **[`SphericalPoint`]**: radius in metres, azimuth/elevation in radians,
//!   with an explicit [`SphericalPoint::to_cartesian`] conversion and a
//!   law-of-cosines distance.
//!
//! The two conventions are never mixed implicitly; conversions are always a
//! visible call at the boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use srir_spatial::{CartesianPoint, SphericalPoint};
//!
//! let mic = CartesianPoint::new(0.0, 0.042, 0.0);
//! let src = SphericalPoint::from_degrees(2.0, 30.0, 0.0).unwrap().to_cartesian();
//! let metres = mic.distance(&src);
//! assert!(metres > 0.0);
//! ```

pub mod error;
pub mod point;

pub use error::{Result, SpatialError};
pub use point::{CartesianPoint, SphericalPoint};
