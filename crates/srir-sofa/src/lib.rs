//! # srir-sofa
//!
//! A self-describing container for spatial room impulse responses,
//! carrying the SOFA `SingleRoomSRIR` schema: the fixed dimensions
//! {M, N, E, R, I, C}, the fixed variable set (listener/source/emitter/
//! receiver geometry, `Data.SamplingRate`, `Data.Delay`, `Data.IR`), and
//! the required descriptive attributes.
//!
//! ## File Overview
//!
//! A `.srir` file consists of:
//! - **Header** (64 bytes): magic bytes, version, the six dimension sizes
//! - **Records**: the global attribute block and one record per variable
//! - **Record table**: type, offset, size, and BLAKE3 hash per record
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//! use ndarray::Array3;
//! use srir_sofa::{write_srir, SofaMetadata, SofaReader};
//! use srir_spatial::CartesianPoint;
//!
//! // Writing
//! let rirs = Array3::<f64>::zeros((1, 4, 960));
//! let sources = vec![CartesianPoint::new(2.0, 0.0, 0.0)];
//! let receivers = vec![CartesianPoint::origin(); 4];
//! write_srir(Path::new("room.srir"), &rirs, &sources, &receivers, 48_000,
//!     &SofaMetadata::default()).unwrap();
//!
//! // Reading
//! let reader = SofaReader::open(Path::new("room.srir")).unwrap();
//! assert_eq!(reader.dimensions().r, 4);
//! ```

pub mod error;
pub mod metadata;
pub mod reader;
pub mod schema;
pub mod writer;

pub use error::SofaError;
pub use metadata::SofaMetadata;
pub use reader::SofaReader;
pub use schema::{Dim, Dimensions, Variable};
pub use writer::{write_srir, SofaWriter};
