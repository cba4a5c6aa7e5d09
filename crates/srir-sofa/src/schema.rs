//! The fixed `SingleRoomSRIR` schema: dimension identifiers, variable and
//! attribute names, and the convention strings downstream tooling matches
//! byte-for-byte.
//!
//! Naming, dimension order, and attribute values follow the SOFA
//! (Spatially Oriented Format for Acoustics) `SingleRoomSRIR` convention
//! and must stay stable across releases.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SofaError};

/// Magic bytes identifying a container file: `SRIR` (0x53524952).
pub const SRIR_MAGIC: [u8; 4] = *b"SRIR";

/// Current container version.
pub const SRIR_VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Size of a record table entry in bytes.
pub const RECORD_ENTRY_SIZE: usize = 57;

// ── Convention strings ─────────────────────────────────────────────────────

pub const CONVENTIONS: &str = "SOFA";
pub const CONVENTIONS_VERSION: &str = "2.1";
pub const SOFA_CONVENTIONS: &str = "SingleRoomSRIR";
pub const SOFA_CONVENTIONS_VERSION: &str = "1.0";
pub const DATA_TYPE: &str = "FIR";
pub const ROOM_TYPE: &str = "shoebox";
/// Standard ambisonic channel ordering tag for `Data.IR`.
pub const CHANNEL_ORDERING: &str = "acn";
/// Normalization tag for `Data.IR`.
pub const NORMALIZATION: &str = "sn3d";
pub const UNITS_METRE: &str = "metre";
pub const UNITS_HERTZ: &str = "hertz";
pub const TYPE_CARTESIAN: &str = "cartesian";
pub const TYPE_SPHERICAL: &str = "spherical";

// ── Variable names ─────────────────────────────────────────────────────────

pub const LISTENER_POSITION: &str = "ListenerPosition";
pub const LISTENER_UP: &str = "ListenerUp";
pub const LISTENER_VIEW: &str = "ListenerView";
pub const EMITTER_POSITION: &str = "EmitterPosition";
pub const SOURCE_POSITION: &str = "SourcePosition";
pub const SOURCE_UP: &str = "SourceUp";
pub const SOURCE_VIEW: &str = "SourceView";
pub const RECEIVER_POSITION: &str = "ReceiverPosition";
pub const DATA_SAMPLING_RATE: &str = "Data.SamplingRate";
pub const DATA_DELAY: &str = "Data.Delay";
pub const DATA_IR: &str = "Data.IR";

/// The fixed variable order within a container file.
pub const VARIABLE_ORDER: [&str; 11] = [
    LISTENER_POSITION,
    LISTENER_UP,
    LISTENER_VIEW,
    EMITTER_POSITION,
    SOURCE_POSITION,
    SOURCE_UP,
    SOURCE_VIEW,
    RECEIVER_POSITION,
    DATA_SAMPLING_RATE,
    DATA_DELAY,
    DATA_IR,
];

// ── Records ────────────────────────────────────────────────────────────────

/// The type of a record within a container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordType {
    /// The global attribute block (exactly one per file, first record).
    Attributes = 0x01,
    /// A named, dimensioned variable.
    Variable = 0x02,
}

impl RecordType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Attributes),
            0x02 => Some(Self::Variable),
            _ => None,
        }
    }
}

// ── Dimensions ─────────────────────────────────────────────────────────────

/// One of the six fixed dimensions. Stored on disk as its ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Dim {
    /// Measurements (source positions).
    M = b'M',
    /// Samples per response.
    N = b'N',
    /// Emitters per measurement (always 1).
    E = b'E',
    /// Receivers.
    R = b'R',
    /// Singleton dimension (always 1).
    I = b'I',
    /// Coordinate dimension (always 3).
    C = b'C',
}

impl Dim {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'M' => Some(Self::M),
            b'N' => Some(Self::N),
            b'E' => Some(Self::E),
            b'R' => Some(Self::R),
            b'I' => Some(Self::I),
            b'C' => Some(Self::C),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        *self as u8 as char
    }
}

/// The six dimension sizes of a container, in canonical M, N, E, R, I, C
/// order. E, I, and C are fixed by the convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub m: u32,
    pub n: u32,
    pub e: u32,
    pub r: u32,
    pub i: u32,
    pub c: u32,
}

impl Dimensions {
    /// Dimensions for M measurements of R receivers and N samples, with
    /// the fixed E=1, I=1, C=3.
    pub fn new(m: u32, r: u32, n: u32) -> Self {
        Self {
            m,
            n,
            e: 1,
            r,
            i: 1,
            c: 3,
        }
    }

    /// The size of one dimension.
    pub fn size_of(&self, dim: Dim) -> u32 {
        match dim {
            Dim::M => self.m,
            Dim::N => self.n,
            Dim::E => self.e,
            Dim::R => self.r,
            Dim::I => self.i,
            Dim::C => self.c,
        }
    }
}

// ── Variables ──────────────────────────────────────────────────────────────

/// A named, dimensioned variable: the unit of payload in a container file.
///
/// Data is stored row-major over the dimension signature, as little-endian
/// f64 values.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Fixed schema name (for instance `Data.IR`).
    pub name: String,
    /// Dimension signature, outermost first (for instance `[M, R, N]`).
    pub dims: Vec<Dim>,
    /// Per-variable attributes such as `Units` and `Type`.
    pub attributes: Vec<(String, String)>,
    /// Flattened row-major payload.
    pub data: Vec<f64>,
}

impl Variable {
    /// The element count this variable's signature implies under `dims`.
    pub fn expected_len(&self, dims: &Dimensions) -> usize {
        self.dims
            .iter()
            .map(|d| dims.size_of(*d) as usize)
            .product()
    }

    /// Looks up a per-variable attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Validates that the payload length matches the dimension signature.
    pub fn check_shape(&self, dims: &Dimensions) -> Result<()> {
        let expected = self.expected_len(dims);
        if self.data.len() != expected {
            return Err(SofaError::ShapeMismatch {
                variable: self.name.clone(),
                expected: format!("{expected} elements for dims {:?}", self.dims),
                got: format!("{} elements", self.data.len()),
            });
        }
        Ok(())
    }
}
