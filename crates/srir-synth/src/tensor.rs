//! The (measurements × receivers × samples) response tensor.

use ndarray::{Array2, Array3};

use crate::error::{Result, SynthError};

/// A stack of multi-channel impulse responses, shaped
/// (M measurements, R receivers, N samples).
///
/// Row order is semantically meaningful: the receiver axis preserves the
/// order of the receiver array end-to-end into the container's R dimension,
/// and the measurement axis preserves source-position order.
#[derive(Debug, Clone, PartialEq)]
pub struct SrirTensor {
    inner: Array3<f64>,
}

impl SrirTensor {
    /// Wraps an already-shaped (M, R, N) array.
    pub fn from_array(inner: Array3<f64>) -> Self {
        Self { inner }
    }

    /// Stacks per-measurement (R × N) matrices into an (M, R, N) tensor.
    ///
    /// Measurements may differ in sample count (the growing length policy
    /// produces longer rows for farther sources); shorter measurements are
    /// right-padded with zeros to the longest N.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::EmptyInput`] when no measurements are given
    /// and [`SynthError::InvalidArgument`] when receiver counts differ
    /// across measurements.
    pub fn from_measurements(measurements: Vec<Array2<f64>>) -> Result<Self> {
        if measurements.is_empty() {
            return Err(SynthError::EmptyInput("measurements"));
        }
        let receivers = measurements[0].nrows();
        for m in &measurements {
            if m.nrows() != receivers {
                return Err(SynthError::InvalidArgument {
                    reason: "all measurements must have the same receiver count",
                    value: m.nrows() as f64,
                });
            }
        }
        let samples = measurements.iter().map(|m| m.ncols()).max().unwrap_or(0);

        let mut inner = Array3::zeros((measurements.len(), receivers, samples));
        for (mi, measurement) in measurements.iter().enumerate() {
            inner
                .slice_mut(ndarray::s![mi, .., ..measurement.ncols()])
                .assign(measurement);
        }
        Ok(Self { inner })
    }

    /// Number of measurements (M).
    pub fn measurements(&self) -> usize {
        self.inner.shape()[0]
    }

    /// Number of receivers (R).
    pub fn receivers(&self) -> usize {
        self.inner.shape()[1]
    }

    /// Samples per response (N).
    pub fn samples(&self) -> usize {
        self.inner.shape()[2]
    }

    /// The (M, R, N) shape as a tuple.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.measurements(), self.receivers(), self.samples())
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array3<f64> {
        &self.inner
    }

    /// Consume into the underlying array.
    pub fn into_array(self) -> Array3<f64> {
        self.inner
    }
}
