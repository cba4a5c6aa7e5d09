//! Container writer — serializes a response tensor and its spatial
//! metadata into a `.srir` file.
//!
//! # Binary Layout
//!
//! - **Header** (64 bytes): magic, version, the six dimension sizes in
//!   M, N, E, R, I, C order, record count, record table offset.
//! - **Record data**: the global attribute block followed by the eleven
//!   schema variables in [`crate::schema::VARIABLE_ORDER`], written
//!   sequentially.
//! - **Record table**: one 57-byte entry per record with its type, offset,
//!   size, and BLAKE3 hash.
//!
//! The writer validates every shape **before** opening the output path, so
//! a caller mistake never costs an existing valid file. On a mid-write I/O
//! failure the partial file is removed and the error surfaced.
//!
//! # Example
//!
//! ```rust,no_run
//! use ndarray::Array3;
//! use srir_sofa::{write_srir, SofaMetadata};
//! use srir_spatial::CartesianPoint;
//! use std::path::Path;
//!
//! let rirs = Array3::<f64>::zeros((1, 2, 480));
//! let sources = vec![CartesianPoint::new(2.0, 0.0, 0.0)];
//! let receivers = vec![
//!     CartesianPoint::new(0.0, 0.042, 0.0),
//!     CartesianPoint::new(0.0, -0.042, 0.0),
//! ];
//! write_srir(
//!     Path::new("out.srir"),
//!     &rirs,
//!     &sources,
//!     &receivers,
//!     48_000,
//!     &SofaMetadata::default(),
//! )
//! .unwrap();
//! ```

use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::Array3;
use srir_spatial::CartesianPoint;

use crate::error::{Result, SofaError};
use crate::metadata::SofaMetadata;
use crate::schema::{
    Dim, Dimensions, RecordType, Variable, CHANNEL_ORDERING, CONVENTIONS, CONVENTIONS_VERSION,
    DATA_DELAY, DATA_IR, DATA_SAMPLING_RATE, DATA_TYPE, EMITTER_POSITION, HEADER_SIZE,
    LISTENER_POSITION, LISTENER_UP, LISTENER_VIEW, NORMALIZATION, RECEIVER_POSITION, ROOM_TYPE,
    SOFA_CONVENTIONS, SOFA_CONVENTIONS_VERSION, SOURCE_POSITION, SOURCE_UP, SOURCE_VIEW,
    SRIR_MAGIC, SRIR_VERSION, TYPE_CARTESIAN, TYPE_SPHERICAL, UNITS_HERTZ, UNITS_METRE,
};

/// A serialized record waiting for its table entry.
struct PendingRecord {
    record_type: RecordType,
    data: Vec<u8>,
}

/// Builder for `.srir` container files.
///
/// Collects the response tensor, position arrays, and descriptive
/// metadata, then writes the complete file in a single
/// [`finalize`](SofaWriter::finalize) call.
pub struct SofaWriter {
    /// The (M, R, N) response tensor.
    rirs: Array3<f64>,
    /// One source position per measurement (length M).
    source_positions: Vec<CartesianPoint>,
    /// Receiver positions in channel order (length R).
    receiver_positions: Vec<CartesianPoint>,
    /// Sampling rate in Hz.
    sampling_rate: u32,
    /// Descriptive attribute values.
    metadata: SofaMetadata,
    /// Optional per-measurement listener positions; origin when unset.
    listener_positions: Option<Vec<CartesianPoint>>,
    /// Optional extra fixed processing latency per receiver, in samples.
    /// This is independent of the propagation delay already baked into the
    /// response samples; it defaults to zeros.
    extra_delay: Option<Vec<f64>>,
}

impl SofaWriter {
    /// Creates a writer for the given tensor, positions, and rate.
    pub fn new(
        rirs: Array3<f64>,
        source_positions: Vec<CartesianPoint>,
        receiver_positions: Vec<CartesianPoint>,
        sampling_rate: u32,
    ) -> Self {
        Self {
            rirs,
            source_positions,
            receiver_positions,
            sampling_rate,
            metadata: SofaMetadata::default(),
            listener_positions: None,
            extra_delay: None,
        }
    }

    /// Sets the descriptive metadata.
    pub fn set_metadata(&mut self, metadata: SofaMetadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    /// Sets per-measurement listener positions (length must equal M).
    pub fn set_listener_positions(&mut self, positions: Vec<CartesianPoint>) -> &mut Self {
        self.listener_positions = Some(positions);
        self
    }

    /// Sets the extra fixed latency per receiver in samples (length must
    /// equal R). Distinct from the propagation shift already applied to
    /// the response samples.
    pub fn set_extra_delay(&mut self, delay: Vec<f64>) -> &mut Self {
        self.extra_delay = Some(delay);
        self
    }

    /// Validates every array against the tensor's dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SofaError::ShapeMismatch`] naming the offending variable
    /// and dimension. Runs before any filesystem access.
    fn validate(&self) -> Result<Dimensions> {
        let shape = self.rirs.shape();
        let (m, r, n) = (shape[0], shape[1], shape[2]);
        if m == 0 || r == 0 || n == 0 {
            return Err(SofaError::ShapeMismatch {
                variable: DATA_IR.to_string(),
                expected: "all of M, R, N positive".to_string(),
                got: format!("({m}, {r}, {n})"),
            });
        }
        if self.source_positions.len() != m {
            return Err(SofaError::ShapeMismatch {
                variable: SOURCE_POSITION.to_string(),
                expected: format!("M = {m} positions"),
                got: format!("{} positions", self.source_positions.len()),
            });
        }
        if self.receiver_positions.len() != r {
            return Err(SofaError::ShapeMismatch {
                variable: RECEIVER_POSITION.to_string(),
                expected: format!("R = {r} positions"),
                got: format!("{} positions", self.receiver_positions.len()),
            });
        }
        if let Some(listeners) = &self.listener_positions {
            if listeners.len() != m {
                return Err(SofaError::ShapeMismatch {
                    variable: LISTENER_POSITION.to_string(),
                    expected: format!("M = {m} positions"),
                    got: format!("{} positions", listeners.len()),
                });
            }
        }
        if let Some(delay) = &self.extra_delay {
            if delay.len() != r {
                return Err(SofaError::ShapeMismatch {
                    variable: DATA_DELAY.to_string(),
                    expected: format!("R = {r} values"),
                    got: format!("{} values", delay.len()),
                });
            }
        }
        Ok(Dimensions::new(m as u32, r as u32, n as u32))
    }

    /// The global attribute block, in the fixed schema order.
    fn build_attributes(&self) -> Vec<(String, String)> {
        let now = chrono::Utc::now().to_rfc3339();
        let meta = &self.metadata;
        [
            ("Conventions", CONVENTIONS.to_string()),
            ("Version", CONVENTIONS_VERSION.to_string()),
            ("SOFAConventions", SOFA_CONVENTIONS.to_string()),
            ("SOFAConventionsVersion", SOFA_CONVENTIONS_VERSION.to_string()),
            ("APIName", env!("CARGO_PKG_NAME").to_string()),
            ("APIVersion", env!("CARGO_PKG_VERSION").to_string()),
            ("AuthorContact", meta.author_contact.clone()),
            ("Organization", meta.organization.clone()),
            ("License", meta.license.clone()),
            ("DataType", DATA_TYPE.to_string()),
            ("DateCreated", now.clone()),
            ("DateModified", now),
            ("Title", meta.title()),
            ("RoomType", ROOM_TYPE.to_string()),
            ("DatabaseName", meta.database_name.clone()),
            ("ListenerShortName", meta.listener_name.clone()),
            ("RoomShortName", meta.room_name.clone()),
            ("Comment", meta.comment.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }

    /// The eleven schema variables, in the fixed file order.
    fn build_variables(&self, dims: &Dimensions) -> Vec<Variable> {
        let m = dims.m as usize;
        let r = dims.r as usize;

        let cartesian_attrs = || {
            vec![
                ("Units".to_string(), UNITS_METRE.to_string()),
                ("Type".to_string(), TYPE_CARTESIAN.to_string()),
            ]
        };
        let flatten = |points: &[CartesianPoint]| -> Vec<f64> {
            points.iter().flat_map(|p| p.to_array()).collect()
        };

        let listener_data = match &self.listener_positions {
            Some(points) => flatten(points),
            None => vec![0.0; m * 3],
        };

        vec![
            Variable {
                name: LISTENER_POSITION.to_string(),
                dims: vec![Dim::M, Dim::C],
                attributes: cartesian_attrs(),
                data: listener_data,
            },
            Variable {
                name: LISTENER_UP.to_string(),
                dims: vec![Dim::I, Dim::C],
                attributes: cartesian_attrs(),
                data: vec![0.0, 0.0, 1.0],
            },
            // Listener looking forward (+x direction).
            Variable {
                name: LISTENER_VIEW.to_string(),
                dims: vec![Dim::I, Dim::C],
                attributes: cartesian_attrs(),
                data: vec![1.0, 0.0, 0.0],
            },
            // Single emitter per measurement, zeroed placeholder.
            Variable {
                name: EMITTER_POSITION.to_string(),
                dims: vec![Dim::E, Dim::C, Dim::I],
                attributes: vec![
                    ("Units".to_string(), UNITS_METRE.to_string()),
                    ("Type".to_string(), TYPE_SPHERICAL.to_string()),
                ],
                data: vec![0.0; 3],
            },
            Variable {
                name: SOURCE_POSITION.to_string(),
                dims: vec![Dim::M, Dim::C],
                attributes: cartesian_attrs(),
                data: flatten(&self.source_positions),
            },
            Variable {
                name: SOURCE_UP.to_string(),
                dims: vec![Dim::I, Dim::C],
                attributes: cartesian_attrs(),
                data: vec![0.0, 0.0, 1.0],
            },
            Variable {
                name: SOURCE_VIEW.to_string(),
                dims: vec![Dim::I, Dim::C],
                attributes: cartesian_attrs(),
                data: vec![1.0, 0.0, 0.0],
            },
            // Receiver coordinates verbatim, in channel order.
            Variable {
                name: RECEIVER_POSITION.to_string(),
                dims: vec![Dim::R, Dim::C, Dim::I],
                attributes: cartesian_attrs(),
                data: flatten(&self.receiver_positions),
            },
            Variable {
                name: DATA_SAMPLING_RATE.to_string(),
                dims: vec![Dim::I],
                attributes: vec![("Units".to_string(), UNITS_HERTZ.to_string())],
                data: vec![self.sampling_rate as f64],
            },
            Variable {
                name: DATA_DELAY.to_string(),
                dims: vec![Dim::I, Dim::R],
                attributes: vec![],
                data: self
                    .extra_delay
                    .clone()
                    .unwrap_or_else(|| vec![0.0; r]),
            },
            Variable {
                name: DATA_IR.to_string(),
                dims: vec![Dim::M, Dim::R, Dim::N],
                attributes: vec![
                    ("ChannelOrdering".to_string(), CHANNEL_ORDERING.to_string()),
                    ("Normalization".to_string(), NORMALIZATION.to_string()),
                ],
                data: self.rirs.iter().copied().collect(),
            },
        ]
    }

    /// Serialize the global attribute block.
    ///
    /// Layout: count (u16 LE), then per attribute a u16-length-prefixed
    /// name and a u32-length-prefixed UTF-8 value.
    fn serialize_attributes(attributes: &[(String, String)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u16::<LittleEndian>(attributes.len() as u16)
            .expect("write to Vec cannot fail");
        for (name, value) in attributes {
            Self::put_str16(&mut buf, name);
            Self::put_str32(&mut buf, value);
        }
        buf
    }

    /// Serialize one variable record.
    ///
    /// Layout: u16-length name, dim count (u8) + one ASCII byte per
    /// dimension, attribute count (u16) + attribute pairs, element count
    /// (u64) + f64 LE values.
    fn serialize_variable(variable: &Variable) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + variable.data.len() * 8);
        Self::put_str16(&mut buf, &variable.name);
        buf.write_u8(variable.dims.len() as u8)
            .expect("write to Vec cannot fail");
        for dim in &variable.dims {
            buf.write_u8(*dim as u8).expect("write to Vec cannot fail");
        }
        buf.write_u16::<LittleEndian>(variable.attributes.len() as u16)
            .expect("write to Vec cannot fail");
        for (name, value) in &variable.attributes {
            Self::put_str16(&mut buf, name);
            Self::put_str32(&mut buf, value);
        }
        buf.write_u64::<LittleEndian>(variable.data.len() as u64)
            .expect("write to Vec cannot fail");
        for &value in &variable.data {
            buf.write_f64::<LittleEndian>(value)
                .expect("write to Vec cannot fail");
        }
        buf
    }

    fn put_str16(buf: &mut Vec<u8>, s: &str) {
        buf.write_u16::<LittleEndian>(s.len() as u16)
            .expect("write to Vec cannot fail");
        buf.extend_from_slice(s.as_bytes());
    }

    fn put_str32(buf: &mut Vec<u8>, s: &str) {
        buf.write_u32::<LittleEndian>(s.len() as u32)
            .expect("write to Vec cannot fail");
        buf.extend_from_slice(s.as_bytes());
    }

    /// Write the 64-byte header.
    fn write_header<W: Write>(
        writer: &mut W,
        dims: &Dimensions,
        record_count: u32,
        record_table_offset: u64,
    ) -> Result<()> {
        // [0..4]: magic
        writer.write_all(&SRIR_MAGIC)?;
        // [4..6]: version (u16 LE)
        writer.write_u16::<LittleEndian>(SRIR_VERSION)?;
        // [6..30]: M, N, E, R, I, C (u32 LE each)
        writer.write_u32::<LittleEndian>(dims.m)?;
        writer.write_u32::<LittleEndian>(dims.n)?;
        writer.write_u32::<LittleEndian>(dims.e)?;
        writer.write_u32::<LittleEndian>(dims.r)?;
        writer.write_u32::<LittleEndian>(dims.i)?;
        writer.write_u32::<LittleEndian>(dims.c)?;
        // [30..34]: record count (u32 LE)
        writer.write_u32::<LittleEndian>(record_count)?;
        // [34..42]: record table offset (u64 LE)
        writer.write_u64::<LittleEndian>(record_table_offset)?;
        // [42..64]: reserved
        writer.write_all(&[0u8; 22])?;
        Ok(())
    }

    /// Write records and the record table; returns nothing on success.
    fn write_body<W: Write + Seek>(
        writer: &mut W,
        dims: &Dimensions,
        records: &[PendingRecord],
    ) -> Result<()> {
        // Placeholder header; table offset patched at the end.
        Self::write_header(writer, dims, records.len() as u32, 0)?;

        let mut offsets = Vec::with_capacity(records.len());
        let mut current_offset = HEADER_SIZE as u64;
        for record in records {
            let hash = blake3::hash(&record.data);
            offsets.push((record.record_type, current_offset, record.data.len() as u64, hash));
            writer.write_all(&record.data)?;
            current_offset += record.data.len() as u64;
        }

        let record_table_offset = current_offset;
        for (record_type, offset, size, hash) in &offsets {
            writer.write_u8(*record_type as u8)?;
            writer.write_u64::<LittleEndian>(*offset)?;
            writer.write_u64::<LittleEndian>(*size)?;
            writer.write_all(hash.as_bytes())?;
            writer.write_all(&[0u8; 8])?;
        }

        writer.seek(SeekFrom::Start(0))?;
        Self::write_header(writer, dims, records.len() as u32, record_table_offset)?;
        writer.flush()?;
        Ok(())
    }

    /// Finalize and write the complete container file.
    ///
    /// Shapes are validated first; an existing file at `path` is then
    /// fully replaced. A failure during writing removes the partial file
    /// before returning the error.
    ///
    /// # Errors
    ///
    /// [`SofaError::ShapeMismatch`] for inconsistent inputs,
    /// [`SofaError::Io`] for filesystem failures.
    pub fn finalize(&self, path: &Path) -> Result<()> {
        let dims = self.validate()?;

        let attributes = self.build_attributes();
        let variables = self.build_variables(&dims);
        let mut records = Vec::with_capacity(1 + variables.len());
        records.push(PendingRecord {
            record_type: RecordType::Attributes,
            data: Self::serialize_attributes(&attributes),
        });
        for variable in &variables {
            records.push(PendingRecord {
                record_type: RecordType::Variable,
                data: Self::serialize_variable(variable),
            });
        }

        if path.exists() {
            tracing::info!(path = %path.display(), "Replacing existing container file");
        }
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);

        match Self::write_body(&mut writer, &dims, &records) {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    m = dims.m,
                    r = dims.r,
                    n = dims.n,
                    records = records.len(),
                    "Container file written"
                );
                Ok(())
            }
            Err(e) => {
                // A half-written file must not survive looking valid.
                drop(writer);
                let _ = std::fs::remove_file(path);
                Err(e)
            }
        }
    }
}

/// Writes a response tensor plus spatial metadata to `path` in one call.
///
/// Preconditions: `rirs` is (M, R, N); `source_positions` has length M;
/// `receiver_positions` has length R. Violations fail with
/// [`SofaError::ShapeMismatch`] naming the offending variable before the
/// filesystem is touched. An existing file at `path` is fully replaced.
pub fn write_srir(
    path: &Path,
    rirs: &Array3<f64>,
    source_positions: &[CartesianPoint],
    receiver_positions: &[CartesianPoint],
    sampling_rate: u32,
    metadata: &SofaMetadata,
) -> Result<()> {
    let mut writer = SofaWriter::new(
        rirs.clone(),
        source_positions.to_vec(),
        receiver_positions.to_vec(),
        sampling_rate,
    );
    writer.set_metadata(metadata.clone());
    writer.finalize(path)
}
