//! The mono impulse response input.

use crate::error::{Result, SynthError};

/// A mono impulse response: an ordered sample sequence plus its sampling
/// rate. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoIr {
    samples: Vec<f64>,
    sampling_rate: u32,
}

impl MonoIr {
    /// Creates a mono impulse response.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::EmptyInput`] for an empty sample sequence and
    /// [`SynthError::InvalidArgument`] for a zero sampling rate.
    pub fn new(samples: Vec<f64>, sampling_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(SynthError::EmptyInput("impulse response"));
        }
        if sampling_rate == 0 {
            return Err(SynthError::InvalidArgument {
                reason: "sampling rate must be positive",
                value: 0.0,
            });
        }
        Ok(Self {
            samples,
            sampling_rate,
        })
    }

    /// The amplitude samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The sampling rate in Hz.
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false — construction rejects empty sample sequences.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sampling_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_ir_rejects_empty() {
        assert!(matches!(
            MonoIr::new(vec![], 48_000),
            Err(SynthError::EmptyInput("impulse response"))
        ));
    }

    #[test]
    fn test_mono_ir_rejects_zero_rate() {
        assert!(matches!(
            MonoIr::new(vec![1.0], 0),
            Err(SynthError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_mono_ir_duration() {
        let ir = MonoIr::new(vec![0.0; 24_000], 48_000).unwrap();
        assert!((ir.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(ir.len(), 24_000);
    }
}
