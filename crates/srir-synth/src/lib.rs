//! # srir-synth — delay-and-assemble SRIR synthesis
//!
//! Turns a mono impulse response plus array geometry into a multi-channel
//! spatial room impulse response by modeling per-receiver propagation
//! delays.
//!
//! ## Architecture
//!
//! - **[`delay`]**: distance → seconds → whole-sample delay conversion with
//!   one documented speed-of-sound constant.
//! - **[`shift`]**: causal delay application with an explicit output-length
//!   policy (grow vs truncate) and an optional fractional-delay variant.
//! - **[`synth`]**: per-receiver fan-out and tensor assembly.
//! - **[`tensor`]**: the (M × R × N) response tensor handed to the
//!   container writer.
//! - **[`ir`]**: the validated mono input.
//! - **[`error`]**: error types for all synthesis operations.
//!
//! ## Quick Start
//!
//! ```rust
//! use srir_spatial::CartesianPoint;
//! use srir_synth::{synthesize_many, MonoIr, SynthConfig};
//!
//! let ir = MonoIr::new(vec![1.0, 0.4, 0.1], 48_000).unwrap();
//! let receivers = [
//!     CartesianPoint::new(0.0, 0.042, 0.0),
//!     CartesianPoint::new(0.0, -0.042, 0.0),
//! ];
//! let sources = [CartesianPoint::new(2.0, 0.0, 0.0)];
//!
//! let tensor = synthesize_many(&ir, &receivers, &sources, &SynthConfig::default()).unwrap();
//! assert_eq!(tensor.receivers(), 2);
//! ```

pub mod delay;
pub mod error;
pub mod ir;
pub mod shift;
pub mod synth;
pub mod tensor;

pub use delay::{distance_to_seconds, seconds_to_samples, DEFAULT_SPEED_OF_SOUND};
pub use error::{Result, SynthError};
pub use ir::MonoIr;
pub use shift::{fractional_shift, shift, LengthPolicy};
pub use synth::{synthesize, synthesize_many, SynthConfig};
pub use tensor::SrirTensor;
