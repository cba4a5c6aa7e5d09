//! Delay-line application: producing a causally delayed copy of a signal.
//!
//! Energy arriving at sample index 0 of the input appears at index `delay`
//! of the output, with zeros padding the head. What happens to the tail is
//! an explicit, caller-selected [`LengthPolicy`].

use crate::error::{Result, SynthError};

/// Output-length policy for [`shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Output length = input length + delay. No information loss; the tail
    /// of a long impulse response survives arbitrarily large delays. The
    /// recommended default.
    #[default]
    Grow,
    /// Output length = input length; the last `delay` samples are dropped
    /// to make room for the leading zeros. Receivers farther from the
    /// source lose tail energy, and a delay of at least the signal length
    /// yields pure silence (without erroring).
    Truncate,
}

/// Delays `signal` by a whole number of samples.
///
/// A zero delay returns the signal unchanged. The head is zero-padded; the
/// tail follows `policy`.
///
/// # Errors
///
/// Returns [`SynthError::EmptyInput`] for an empty signal.
pub fn shift(signal: &[f64], delay: usize, policy: LengthPolicy) -> Result<Vec<f64>> {
    if signal.is_empty() {
        return Err(SynthError::EmptyInput("signal"));
    }
    if delay == 0 {
        return Ok(signal.to_vec());
    }
    match policy {
        LengthPolicy::Grow => {
            let mut out = vec![0.0; signal.len() + delay];
            out[delay..].copy_from_slice(signal);
            Ok(out)
        }
        LengthPolicy::Truncate => {
            let mut out = vec![0.0; signal.len()];
            if delay < signal.len() {
                let kept = signal.len() - delay;
                out[delay..].copy_from_slice(&signal[..kept]);
            }
            Ok(out)
        }
    }
}

/// Delays `signal` by a possibly fractional number of samples, using linear
/// interpolation between adjacent samples for the sub-sample part.
///
/// The integer part behaves exactly like [`shift`]; a fractional part `f`
/// blends each output sample from the two nearest delayed input samples as
/// `(1 − f)·x[i − k] + f·x[i − k − 1]`. With `Grow`, the output has
/// `len + ceil(delay)` samples.
///
/// # Errors
///
/// Returns [`SynthError::EmptyInput`] for an empty signal and
/// [`SynthError::InvalidArgument`] for a negative or non-finite delay.
pub fn fractional_shift(signal: &[f64], delay: f64, policy: LengthPolicy) -> Result<Vec<f64>> {
    if signal.is_empty() {
        return Err(SynthError::EmptyInput("signal"));
    }
    if !delay.is_finite() || delay < 0.0 {
        return Err(SynthError::InvalidArgument {
            reason: "delay must be a non-negative finite number of samples",
            value: delay,
        });
    }

    let whole = delay.floor() as usize;
    let frac = delay - delay.floor();
    if frac == 0.0 {
        return shift(signal, whole, policy);
    }

    let out_len = match policy {
        LengthPolicy::Grow => signal.len() + whole + 1,
        LengthPolicy::Truncate => signal.len(),
    };
    let mut out = vec![0.0; out_len];
    for (i, slot) in out.iter_mut().enumerate() {
        let near = i
            .checked_sub(whole)
            .and_then(|j| signal.get(j))
            .copied()
            .unwrap_or(0.0);
        let far = i
            .checked_sub(whole + 1)
            .and_then(|j| signal.get(j))
            .copied()
            .unwrap_or(0.0);
        *slot = (1.0 - frac) * near + frac * far;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_zero_delay_is_identity() {
        let signal = vec![1.0, 2.0, 3.0];
        assert_eq!(shift(&signal, 0, LengthPolicy::Grow).unwrap(), signal);
        assert_eq!(shift(&signal, 0, LengthPolicy::Truncate).unwrap(), signal);
    }

    #[test]
    fn test_shift_grow_preserves_signal_verbatim() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let out = shift(&signal, 3, LengthPolicy::Grow).unwrap();
        assert_eq!(out.len(), 7);
        assert_eq!(&out[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&out[3..], &signal[..]);
    }

    #[test]
    fn test_shift_truncate_drops_tail() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let out = shift(&signal, 2, LengthPolicy::Truncate).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_shift_truncate_full_delay_is_silence() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        for delay in [4, 5, 100] {
            let out = shift(&signal, delay, LengthPolicy::Truncate).unwrap();
            assert_eq!(out, vec![0.0; 4], "delay {delay} must give silence");
        }
    }

    #[test]
    fn test_shift_grow_large_delay_keeps_everything() {
        let signal = vec![1.0, 2.0];
        let out = shift(&signal, 100, LengthPolicy::Grow).unwrap();
        assert_eq!(out.len(), 102);
        assert_eq!(&out[100..], &signal[..]);
        assert!(out[..100].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_shift_empty_signal_fails() {
        assert!(matches!(
            shift(&[], 1, LengthPolicy::Grow),
            Err(SynthError::EmptyInput("signal"))
        ));
    }

    #[test]
    fn test_fractional_shift_integer_delay_matches_shift() {
        let signal = vec![1.0, -2.0, 0.5];
        let a = fractional_shift(&signal, 2.0, LengthPolicy::Grow).unwrap();
        let b = shift(&signal, 2, LengthPolicy::Grow).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fractional_shift_half_sample() {
        let signal = vec![1.0, 0.0];
        let out = fractional_shift(&signal, 0.5, LengthPolicy::Grow).unwrap();
        // The unit impulse spreads evenly over the two neighbouring samples.
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 0.5).abs() < 1e-12);
        assert!(out[2].abs() < 1e-12);
    }

    #[test]
    fn test_fractional_shift_truncate_keeps_length() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let out = fractional_shift(&signal, 1.25, LengthPolicy::Truncate).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_shift_rejects_negative_delay() {
        assert!(matches!(
            fractional_shift(&[1.0], -0.5, LengthPolicy::Grow),
            Err(SynthError::InvalidArgument { .. })
        ));
    }
}
