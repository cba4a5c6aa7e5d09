//! Receiver and source positions in 3D space.
//!
//! Two coordinate conventions exist side by side and are never mixed
//! implicitly: [`CartesianPoint`] (metres along x/y/z) and
//! [`SphericalPoint`] (radius in metres, azimuth and elevation in radians).
//! Workflows that hold spherical data convert through
//! [`SphericalPoint::to_cartesian`] before entering a Cartesian pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpatialError};

/// A position in Cartesian coordinates, in metres.
///
/// The axis convention follows the acoustic-measurement habit:
/// x = forward, y = left, z = up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    /// Forward axis, metres.
    pub x: f64,
    /// Left axis, metres.
    pub y: f64,
    /// Up axis, metres.
    pub z: f64,
}

impl CartesianPoint {
    /// Creates a new Cartesian point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The coordinate origin.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance to `other`, in metres.
    ///
    /// Symmetric, non-negative, and zero for identical points.
    pub fn distance(&self, other: &CartesianPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The point as a `[x, y, z]` triple (container variables store
    /// positions as C=3 coordinate rows).
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for CartesianPoint {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// A position in spherical coordinates.
///
/// The radius is in metres; azimuth and elevation are **radians**.
/// Callers holding degrees convert through [`SphericalPoint::from_degrees`]
/// before any distance computation — the distance functions do not convert
/// internally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPoint {
    /// Distance from the origin, metres. Non-negative.
    pub radius: f64,
    /// Azimuth angle, radians (0 = +x, counter-clockwise towards +y).
    pub azimuth: f64,
    /// Elevation angle, radians (0 = horizontal plane, +π/2 = up).
    pub elevation: f64,
}

impl SphericalPoint {
    /// Creates a new spherical point with validation.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRadius`] for a negative radius and
    /// [`SpatialError::NonFiniteCoordinate`] for NaN/infinite members.
    pub fn new(radius: f64, azimuth: f64, elevation: f64) -> Result<Self> {
        if !radius.is_finite() {
            return Err(SpatialError::NonFiniteCoordinate {
                component: "radius",
                value: radius,
            });
        }
        if radius < 0.0 {
            return Err(SpatialError::InvalidRadius(radius));
        }
        if !azimuth.is_finite() {
            return Err(SpatialError::NonFiniteCoordinate {
                component: "azimuth",
                value: azimuth,
            });
        }
        if !elevation.is_finite() {
            return Err(SpatialError::NonFiniteCoordinate {
                component: "elevation",
                value: elevation,
            });
        }
        Ok(Self {
            radius,
            azimuth,
            elevation,
        })
    }

    /// Creates a spherical point from angles given in degrees.
    ///
    /// # Errors
    ///
    /// Same validation as [`SphericalPoint::new`].
    pub fn from_degrees(radius: f64, azimuth_deg: f64, elevation_deg: f64) -> Result<Self> {
        Self::new(radius, azimuth_deg.to_radians(), elevation_deg.to_radians())
    }

    /// Distance to `other` via the spherical law of cosines:
    ///
    /// `d = sqrt(r1² + r2² − 2·r1·r2·(sin(el1)·sin(el2)·cos(Δaz) + cos(el1)·cos(el2)))`
    ///
    /// Both points must use radians. Two points at the origin yield 0.
    pub fn distance(&self, other: &SphericalPoint) -> f64 {
        let (r1, r2) = (self.radius, other.radius);
        let delta_az = other.azimuth - self.azimuth;
        let angular = self.elevation.sin() * other.elevation.sin() * delta_az.cos()
            + self.elevation.cos() * other.elevation.cos();
        // Clamp the radicand: rounding can push it a hair below zero when
        // the points coincide.
        (r1 * r1 + r2 * r2 - 2.0 * r1 * r2 * angular).max(0.0).sqrt()
    }

    /// Converts to Cartesian coordinates.
    ///
    /// Azimuth 0 maps to +x, azimuth π/2 to +y, elevation π/2 to +z.
    pub fn to_cartesian(&self) -> CartesianPoint {
        let x = self.radius * self.azimuth.cos() * self.elevation.cos();
        let y = self.radius * self.azimuth.sin() * self.elevation.cos();
        let z = self.radius * self.elevation.sin();
        CartesianPoint::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cartesian_distance_symmetric() {
        let a = CartesianPoint::new(1.0, 2.0, 3.0);
        let b = CartesianPoint::new(-4.0, 0.5, 9.0);
        assert!((a.distance(&b) - b.distance(&a)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cartesian_distance_identity() {
        let a = CartesianPoint::new(1.0, 2.0, 3.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_cartesian_distance_unit_axes() {
        let o = CartesianPoint::origin();
        assert!((o.distance(&CartesianPoint::new(1.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((o.distance(&CartesianPoint::new(0.0, -1.0, 0.0)) - 1.0).abs() < 1e-12);
        let diag = CartesianPoint::new(3.0, 4.0, 0.0);
        assert!((o.distance(&diag) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_spherical_new_rejects_negative_radius() {
        assert!(matches!(
            SphericalPoint::new(-1.0, 0.0, 0.0),
            Err(SpatialError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_spherical_new_rejects_non_finite() {
        assert!(matches!(
            SphericalPoint::new(1.0, f64::NAN, 0.0),
            Err(SpatialError::NonFiniteCoordinate { component: "azimuth", .. })
        ));
        assert!(matches!(
            SphericalPoint::new(f64::INFINITY, 0.0, 0.0),
            Err(SpatialError::NonFiniteCoordinate { component: "radius", .. })
        ));
    }

    #[test]
    fn test_spherical_distance_equal_angles_is_radius_difference() {
        let a = SphericalPoint::new(2.0, 0.7, -0.3).unwrap();
        let b = SphericalPoint::new(5.5, 0.7, -0.3).unwrap();
        assert!((a.distance(&b) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_spherical_distance_both_at_origin() {
        let a = SphericalPoint::new(0.0, 0.0, 0.0).unwrap();
        let b = SphericalPoint::new(0.0, PI, FRAC_PI_2).unwrap();
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn test_spherical_distance_matches_cartesian() {
        let a = SphericalPoint::new(1.5, 0.4, 0.2).unwrap();
        let b = SphericalPoint::new(3.0, -1.1, 0.9).unwrap();
        let expected = a.to_cartesian().distance(&b.to_cartesian());
        assert!((a.distance(&b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_from_degrees() {
        let p = SphericalPoint::from_degrees(1.0, 90.0, 0.0).unwrap();
        assert!((p.azimuth - FRAC_PI_2).abs() < 1e-12);
        let c = p.to_cartesian();
        assert!(c.x.abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
        assert!(c.z.abs() < 1e-12);
    }

    #[test]
    fn test_to_cartesian_up() {
        let p = SphericalPoint::from_degrees(2.0, 0.0, 90.0).unwrap();
        let c = p.to_cartesian();
        assert!(c.x.abs() < 1e-12);
        assert!(c.y.abs() < 1e-12);
        assert!((c.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cartesian_serde_round_trip() {
        let p = CartesianPoint::new(1.0, -2.5, 0.25);
        let json = serde_json::to_string(&p).unwrap();
        let back: CartesianPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
