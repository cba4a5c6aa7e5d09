//! Synthesis orchestration: mono impulse response + array geometry →
//! multi-channel response.
//!
//! For each receiver, the Cartesian distance to the source becomes a
//! propagation delay, the mono response is shifted by that delay, and the
//! shifted rows are stacked in receiver order. Receivers are independent,
//! so the fan-out runs on the rayon thread pool; row order is still the
//! input order.

use ndarray::Array2;
use rayon::prelude::*;
use srir_spatial::CartesianPoint;

use crate::delay::{distance_to_seconds, seconds_to_samples, DEFAULT_SPEED_OF_SOUND};
use crate::error::{Result, SynthError};
use crate::ir::MonoIr;
use crate::shift::{shift, LengthPolicy};
use crate::tensor::SrirTensor;

/// Knobs for a synthesis run. Everything configurable is here — nothing is
/// buried in the algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    /// Speed of sound in m/s, used for every receiver of the run.
    pub speed_of_sound: f64,
    /// Output-length policy applied to every shifted channel.
    pub length_policy: LengthPolicy,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            length_policy: LengthPolicy::Grow,
        }
    }
}

/// Synthesizes one measurement: the multi-channel response of `receivers`
/// to a source at `source`, as an (R × N) matrix in receiver order.
///
/// Deterministic: identical inputs give identical output, bit for bit.
///
/// # Errors
///
/// Returns [`SynthError::EmptyInput`] for an empty receiver list and
/// propagates conversion/shift errors from the sub-steps unchanged.
pub fn synthesize(
    ir: &MonoIr,
    receivers: &[CartesianPoint],
    source: &CartesianPoint,
    config: &SynthConfig,
) -> Result<Array2<f64>> {
    if receivers.is_empty() {
        return Err(SynthError::EmptyInput("receiver array"));
    }

    let delays = receivers
        .iter()
        .map(|receiver| {
            let metres = source.distance(receiver);
            let seconds = distance_to_seconds(metres, config.speed_of_sound)?;
            seconds_to_samples(seconds, ir.sampling_rate())
        })
        .collect::<Result<Vec<usize>>>()?;

    tracing::debug!(
        receivers = receivers.len(),
        max_delay = delays.iter().max().copied().unwrap_or(0),
        policy = ?config.length_policy,
        "Computed per-receiver delays"
    );

    let rows = delays
        .par_iter()
        .map(|&delay| shift(ir.samples(), delay, config.length_policy))
        .collect::<Result<Vec<Vec<f64>>>>()?;

    // Under the growing policy rows differ in length; right-pad with zeros
    // so they stack into one matrix.
    let samples = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = Array2::zeros((rows.len(), samples));
    for (ri, row) in rows.iter().enumerate() {
        out.slice_mut(ndarray::s![ri, ..row.len()])
            .assign(&ndarray::ArrayView1::from(&row[..]));
    }
    Ok(out)
}

/// Synthesizes M measurements against the same receiver array, one per
/// source position, stacked into an (M, R, N) tensor. Measurements are
/// padded to a common N.
///
/// # Errors
///
/// Returns [`SynthError::EmptyInput`] for an empty source list; otherwise
/// as [`synthesize`].
pub fn synthesize_many(
    ir: &MonoIr,
    receivers: &[CartesianPoint],
    sources: &[CartesianPoint],
    config: &SynthConfig,
) -> Result<SrirTensor> {
    if sources.is_empty() {
        return Err(SynthError::EmptyInput("source positions"));
    }
    let measurements = sources
        .iter()
        .map(|source| synthesize(ir, receivers, source, config))
        .collect::<Result<Vec<Array2<f64>>>>()?;
    let tensor = SrirTensor::from_measurements(measurements)?;
    tracing::info!(
        measurements = tensor.measurements(),
        receivers = tensor.receivers(),
        samples = tensor.samples(),
        "Assembled response tensor"
    );
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_sample_ir() -> MonoIr {
        MonoIr::new(vec![1.0, 2.0, 3.0, 4.0], 4).unwrap()
    }

    fn unit_speed(policy: LengthPolicy) -> SynthConfig {
        SynthConfig {
            speed_of_sound: 1.0,
            length_policy: policy,
        }
    }

    #[test]
    fn test_end_to_end_grow() {
        // 4-sample response at 4 Hz, 1 m/s speed, receiver 1 m out:
        // delay = round(1/1 * 4) = 4 samples.
        let ir = four_sample_ir();
        let receivers = [CartesianPoint::new(1.0, 0.0, 0.0)];
        let source = CartesianPoint::origin();
        let out = synthesize(&ir, &receivers, &source, &unit_speed(LengthPolicy::Grow)).unwrap();
        assert_eq!(out.shape(), &[1, 8]);
        let row: Vec<f64> = out.row(0).to_vec();
        assert_eq!(row, vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_end_to_end_truncate() {
        let ir = four_sample_ir();
        let receivers = [CartesianPoint::new(1.0, 0.0, 0.0)];
        let source = CartesianPoint::origin();
        let out =
            synthesize(&ir, &receivers, &source, &unit_speed(LengthPolicy::Truncate)).unwrap();
        assert_eq!(out.shape(), &[1, 4]);
        assert_eq!(out.row(0).to_vec(), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_receiver_order_is_preserved() {
        let ir = MonoIr::new(vec![1.0], 10).unwrap();
        let receivers = [
            CartesianPoint::new(2.0, 0.0, 0.0),
            CartesianPoint::origin(),
            CartesianPoint::new(1.0, 0.0, 0.0),
        ];
        let source = CartesianPoint::origin();
        let out = synthesize(&ir, &receivers, &source, &unit_speed(LengthPolicy::Grow)).unwrap();
        // Delays 20, 0, 10 — in the order the receivers were given.
        assert_eq!(out.shape(), &[3, 21]);
        assert_eq!(out[[0, 20]], 1.0);
        assert_eq!(out[[1, 0]], 1.0);
        assert_eq!(out[[2, 10]], 1.0);
    }

    #[test]
    fn test_coincident_source_and_receiver() {
        let ir = four_sample_ir();
        let receivers = [CartesianPoint::origin()];
        let source = CartesianPoint::origin();
        let out = synthesize(&ir, &receivers, &source, &SynthConfig::default()).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_receiver_array_fails() {
        let ir = four_sample_ir();
        assert!(matches!(
            synthesize(&ir, &[], &CartesianPoint::origin(), &SynthConfig::default()),
            Err(SynthError::EmptyInput("receiver array"))
        ));
    }

    #[test]
    fn test_bad_speed_of_sound_propagates() {
        let ir = four_sample_ir();
        let receivers = [CartesianPoint::new(1.0, 0.0, 0.0)];
        let config = SynthConfig {
            speed_of_sound: 0.0,
            length_policy: LengthPolicy::Grow,
        };
        assert!(matches!(
            synthesize(&ir, &receivers, &CartesianPoint::origin(), &config),
            Err(SynthError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let ir = MonoIr::new((0..512).map(|i| (i as f64 * 0.01).sin()).collect(), 24_000).unwrap();
        let receivers: Vec<CartesianPoint> = (0..8)
            .map(|i| CartesianPoint::new(i as f64 * 0.3, 0.1, -0.2))
            .collect();
        let source = CartesianPoint::new(2.0, 1.0, 0.5);
        let config = SynthConfig::default();
        let a = synthesize(&ir, &receivers, &source, &config).unwrap();
        let b = synthesize(&ir, &receivers, &source, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthesize_many_shapes() {
        let ir = MonoIr::new(vec![1.0, 0.5], 8).unwrap();
        let receivers = [
            CartesianPoint::origin(),
            CartesianPoint::new(0.0, 1.0, 0.0),
        ];
        let sources = [
            CartesianPoint::new(1.0, 0.0, 0.0),
            CartesianPoint::new(4.0, 0.0, 0.0),
        ];
        let tensor = synthesize_many(
            &ir,
            &receivers,
            &sources,
            &unit_speed(LengthPolicy::Grow),
        )
        .unwrap();
        // Farthest pair: source at x=4 to receiver at (0,1): sqrt(17) m
        // -> round(sqrt(17) * 8) = 33 samples, so N = 33 + 2.
        assert_eq!(tensor.shape(), (2, 2, 35));
    }

    #[test]
    fn test_synthesize_many_empty_sources_fails() {
        let ir = four_sample_ir();
        let receivers = [CartesianPoint::origin()];
        assert!(matches!(
            synthesize_many(&ir, &receivers, &[], &SynthConfig::default()),
            Err(SynthError::EmptyInput("source positions"))
        ));
    }
}
