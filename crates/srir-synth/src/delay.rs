//! Distance-to-delay conversion.
//!
//! A physical distance becomes a propagation time through a fixed speed of
//! sound, and a propagation time becomes a sample count through the
//! sampling rate. Both conversions are pure and deterministic.

use crate::error::{Result, SynthError};

/// Default speed of sound in metres per second, at typical room temperature
/// (~20 °C). Used consistently throughout a synthesis run unless the caller
/// overrides it.
pub const DEFAULT_SPEED_OF_SOUND: f64 = 343.0;

/// Converts a distance in metres to a propagation time in seconds.
///
/// # Errors
///
/// Returns [`SynthError::InvalidGeometry`] if `distance_m` is negative or
/// non-finite, or if `speed_of_sound` is non-positive or non-finite.
pub fn distance_to_seconds(distance_m: f64, speed_of_sound: f64) -> Result<f64> {
    if !speed_of_sound.is_finite() || speed_of_sound <= 0.0 {
        return Err(SynthError::InvalidGeometry {
            reason: "speed of sound must be a positive finite number of m/s",
            value: speed_of_sound,
        });
    }
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(SynthError::InvalidGeometry {
            reason: "distance must be a non-negative finite number of metres",
            value: distance_m,
        });
    }
    Ok(distance_m / speed_of_sound)
}

/// Converts a propagation time in seconds to a whole-sample delay.
///
/// Rounds half away from zero (`f64::round`), deterministically.
///
/// # Errors
///
/// Returns [`SynthError::InvalidArgument`] for a zero sampling rate and
/// [`SynthError::InvalidGeometry`] for a negative or non-finite time —
/// a negative time means the caller fed a negative distance upstream, and
/// failing loudly beats clamping to a silently wrong delay.
pub fn seconds_to_samples(seconds: f64, sampling_rate: u32) -> Result<usize> {
    if sampling_rate == 0 {
        return Err(SynthError::InvalidArgument {
            reason: "sampling rate must be positive",
            value: 0.0,
        });
    }
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SynthError::InvalidGeometry {
            reason: "propagation time must be a non-negative finite number of seconds",
            value: seconds,
        });
    }
    Ok((seconds * sampling_rate as f64).round() as usize)
}
