//! Container reader — parses `.srir` files for inspection and round-trip
//! verification.
//!
//! The reader validates magic bytes, the container version, record-table
//! bounds, and the BLAKE3 checksum of every record before exposing the
//! dimensions, global attributes, and variables through a safe API.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use srir_sofa::SofaReader;
//!
//! let reader = SofaReader::open(Path::new("capture.srir")).unwrap();
//! println!("{} measurements", reader.dimensions().m);
//! for (name, value) in reader.attributes() {
//!     println!("  {name} = {value}");
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use ndarray::Array3;

use crate::error::{Result, SofaError};
use crate::schema::{
    Dim, Dimensions, RecordType, Variable, DATA_IR, HEADER_SIZE, RECORD_ENTRY_SIZE, SRIR_MAGIC,
    SRIR_VERSION,
};

/// Maximum number of records allowed per file (sanity limit; a
/// conforming file has exactly twelve).
const MAX_RECORD_COUNT: u32 = 64;

/// A parsed record-table entry.
struct RecordEntry {
    record_type: RecordType,
    offset: u64,
    size: u64,
    hash: [u8; 32],
}

/// Reader for `.srir` container files.
///
/// Opening parses and verifies the whole file eagerly; the payloads are
/// small enough (position arrays plus one response tensor) that lazy
/// chunk loading would buy nothing.
pub struct SofaReader {
    dimensions: Dimensions,
    attributes: Vec<(String, String)>,
    variables: Vec<Variable>,
}

impl SofaReader {
    /// Open and fully parse a container file.
    ///
    /// # Errors
    ///
    /// Returns [`SofaError`] if the file is missing, truncated, fails an
    /// integrity check, or does not conform to the schema.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Opening container file");

        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let (dimensions, record_count, table_offset) = Self::read_header(&mut reader)?;

        let entries = Self::read_record_table(&mut reader, record_count, table_offset, file_size)?;

        let mut attributes = Vec::new();
        let mut variables = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let data = Self::read_record_data(&mut reader, entry, index)?;
            match entry.record_type {
                RecordType::Attributes => {
                    attributes = Self::parse_attributes(&data)?;
                }
                RecordType::Variable => {
                    let variable = Self::parse_variable(&data)?;
                    variable.check_shape(&dimensions)?;
                    variables.push(variable);
                }
            }
        }

        tracing::debug!(
            m = dimensions.m,
            r = dimensions.r,
            n = dimensions.n,
            attributes = attributes.len(),
            variables = variables.len(),
            "Parsed container file"
        );

        Ok(Self {
            dimensions,
            attributes,
            variables,
        })
    }

    /// The six dimension sizes.
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Global attributes, in file order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Looks up a global attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All variables, in file order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Looks up a variable by its fixed schema name.
    ///
    /// # Errors
    ///
    /// Returns [`SofaError::VariableNotFound`] if the file carries no
    /// variable of that name.
    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| SofaError::VariableNotFound(name.to_string()))
    }

    /// The response tensor, reshaped to (M, R, N).
    pub fn data_ir(&self) -> Result<Array3<f64>> {
        let dims = &self.dimensions;
        let variable = self.variable(DATA_IR)?;
        let shape = (dims.m as usize, dims.r as usize, dims.n as usize);
        Array3::from_shape_vec(shape, variable.data.clone()).map_err(|_| {
            SofaError::ShapeMismatch {
                variable: DATA_IR.to_string(),
                expected: format!("({}, {}, {})", dims.m, dims.r, dims.n),
                got: format!("{} elements", variable.data.len()),
            }
        })
    }

    // ── parsing helpers ───────────────────────────────────────────────────

    fn read_header<R: Read>(reader: &mut R) -> Result<(Dimensions, u32, u64)> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != SRIR_MAGIC {
            return Err(SofaError::InvalidMagic);
        }
        let version = reader.read_u16::<LittleEndian>()?;
        if version != SRIR_VERSION {
            return Err(SofaError::UnsupportedVersion(version));
        }
        let dimensions = Dimensions {
            m: reader.read_u32::<LittleEndian>()?,
            n: reader.read_u32::<LittleEndian>()?,
            e: reader.read_u32::<LittleEndian>()?,
            r: reader.read_u32::<LittleEndian>()?,
            i: reader.read_u32::<LittleEndian>()?,
            c: reader.read_u32::<LittleEndian>()?,
        };
        let record_count = reader.read_u32::<LittleEndian>()?;
        let table_offset = reader.read_u64::<LittleEndian>()?;
        let mut reserved = [0u8; 22];
        reader.read_exact(&mut reserved)?;
        Ok((dimensions, record_count, table_offset))
    }

    fn read_record_table(
        reader: &mut BufReader<File>,
        record_count: u32,
        table_offset: u64,
        file_size: u64,
    ) -> Result<Vec<RecordEntry>> {
        if record_count > MAX_RECORD_COUNT {
            return Err(SofaError::InvalidOffset {
                offset: table_offset,
                size: record_count as u64 * RECORD_ENTRY_SIZE as u64,
                file_size,
            });
        }
        let table_size = record_count as u64 * RECORD_ENTRY_SIZE as u64;
        if table_offset < HEADER_SIZE as u64 || table_offset + table_size > file_size {
            return Err(SofaError::InvalidOffset {
                offset: table_offset,
                size: table_size,
                file_size,
            });
        }

        reader.seek(SeekFrom::Start(table_offset))?;
        let mut entries = Vec::with_capacity(record_count as usize);
        for _ in 0..record_count {
            let type_byte = reader.read_u8()?;
            let record_type =
                RecordType::from_u8(type_byte).ok_or(SofaError::InvalidRecordType(type_byte))?;
            let offset = reader.read_u64::<LittleEndian>()?;
            let size = reader.read_u64::<LittleEndian>()?;
            let mut hash = [0u8; 32];
            reader.read_exact(&mut hash)?;
            let mut reserved = [0u8; 8];
            reader.read_exact(&mut reserved)?;

            if offset < HEADER_SIZE as u64 || offset + size > file_size {
                return Err(SofaError::InvalidOffset {
                    offset,
                    size,
                    file_size,
                });
            }
            entries.push(RecordEntry {
                record_type,
                offset,
                size,
                hash,
            });
        }
        Ok(entries)
    }

    fn read_record_data(
        reader: &mut BufReader<File>,
        entry: &RecordEntry,
        index: usize,
    ) -> Result<Vec<u8>> {
        reader.seek(SeekFrom::Start(entry.offset))?;
        let mut data = vec![0u8; entry.size as usize];
        reader.read_exact(&mut data)?;

        let computed = blake3::hash(&data);
        if *computed.as_bytes() != entry.hash {
            return Err(SofaError::ChecksumMismatch { index });
        }
        Ok(data)
    }

    fn parse_attributes(data: &[u8]) -> Result<Vec<(String, String)>> {
        let mut cursor = std::io::Cursor::new(data);
        let count = cursor.read_u16::<LittleEndian>()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = Self::take_str16(&mut cursor)?;
            let value = Self::take_str32(&mut cursor)?;
            attributes.push((name, value));
        }
        Ok(attributes)
    }

    fn parse_variable(data: &[u8]) -> Result<Variable> {
        let mut cursor = std::io::Cursor::new(data);
        let name = Self::take_str16(&mut cursor)?;

        let dim_count = cursor.read_u8()?;
        let mut dims = Vec::with_capacity(dim_count as usize);
        for _ in 0..dim_count {
            let id = cursor.read_u8()?;
            dims.push(Dim::from_u8(id).ok_or(SofaError::InvalidDimensionId(id))?);
        }

        let attr_count = cursor.read_u16::<LittleEndian>()?;
        let mut attributes = Vec::with_capacity(attr_count as usize);
        for _ in 0..attr_count {
            let attr_name = Self::take_str16(&mut cursor)?;
            let attr_value = Self::take_str32(&mut cursor)?;
            attributes.push((attr_name, attr_value));
        }

        let value_count = cursor.read_u64::<LittleEndian>()?;
        let mut values = Vec::with_capacity(value_count as usize);
        for _ in 0..value_count {
            values.push(cursor.read_f64::<LittleEndian>()?);
        }

        Ok(Variable {
            name,
            dims,
            attributes,
            data: values,
        })
    }

    fn take_str16(cursor: &mut std::io::Cursor<&[u8]>) -> Result<String> {
        let len = cursor.read_u16::<LittleEndian>()?;
        let mut buf = vec![0u8; len as usize];
        cursor.read_exact(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn take_str32(cursor: &mut std::io::Cursor<&[u8]>) -> Result<String> {
        let len = cursor.read_u32::<LittleEndian>()?;
        let mut buf = vec![0u8; len as usize];
        cursor.read_exact(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SofaMetadata;
    use crate::schema::{
        DATA_DELAY, DATA_SAMPLING_RATE, RECEIVER_POSITION, SOURCE_POSITION, VARIABLE_ORDER,
    };
    use crate::writer::{write_srir, SofaWriter};
    use ndarray::Array3;
    use srir_spatial::CartesianPoint;

    fn receiver_grid(count: usize) -> Vec<CartesianPoint> {
        (0..count)
            .map(|i| CartesianPoint::new(0.0, i as f64 * 0.05, 0.0))
            .collect()
    }

    #[test]
    fn test_round_trip_dimensions_and_tensor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.srir");

        let rirs = Array3::from_shape_fn((2, 3, 100), |(m, r, n)| {
            (m as f64 + 1.0) * 1000.0 + (r as f64) * 100.0 + n as f64 * 0.5
        });
        let sources = vec![
            CartesianPoint::new(1.0, 0.0, 0.0),
            CartesianPoint::new(0.0, 2.0, 0.5),
        ];
        let receivers = receiver_grid(3);

        write_srir(&path, &rirs, &sources, &receivers, 24_000, &SofaMetadata::default()).unwrap();

        let reader = SofaReader::open(&path).unwrap();
        let dims = reader.dimensions();
        assert_eq!((dims.m, dims.r, dims.n), (2, 3, 100));
        assert_eq!((dims.e, dims.i, dims.c), (1, 1, 3));

        let back = reader.data_ir().unwrap();
        assert_eq!(back.shape(), &[2, 3, 100]);
        for (a, b) in rirs.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip_positions_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.srir");

        let rirs = Array3::zeros((1, 2, 8));
        let sources = vec![CartesianPoint::new(1.5, -2.0, 0.25)];
        let receivers = vec![
            CartesianPoint::new(0.0, 0.042, 0.0),
            CartesianPoint::new(0.0, -0.042, 0.0),
        ];
        write_srir(&path, &rirs, &sources, &receivers, 48_000, &SofaMetadata::default()).unwrap();

        let reader = SofaReader::open(&path).unwrap();
        let src = reader.variable(SOURCE_POSITION).unwrap();
        assert_eq!(src.data, vec![1.5, -2.0, 0.25]);
        assert_eq!(src.attribute("Type"), Some("cartesian"));
        assert_eq!(src.attribute("Units"), Some("metre"));

        let rcv = reader.variable(RECEIVER_POSITION).unwrap();
        assert_eq!(rcv.data, vec![0.0, 0.042, 0.0, 0.0, -0.042, 0.0]);

        let sr = reader.variable(DATA_SAMPLING_RATE).unwrap();
        assert_eq!(sr.data, vec![48_000.0]);
    }

    #[test]
    fn test_variable_inventory_matches_schema_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.srir");
        write_srir(
            &path,
            &Array3::zeros((1, 1, 4)),
            &[CartesianPoint::origin()],
            &[CartesianPoint::origin()],
            8_000,
            &SofaMetadata::default(),
        )
        .unwrap();

        let reader = SofaReader::open(&path).unwrap();
        let names: Vec<&str> = reader.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, VARIABLE_ORDER);
    }

    #[test]
    fn test_required_attributes_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attr.srir");
        let meta = SofaMetadata::default()
            .with_database_name("test_db")
            .with_room_name("anechoic")
            .with_listener_name("em32")
            .with_comment("unit test");
        write_srir(
            &path,
            &Array3::zeros((1, 1, 4)),
            &[CartesianPoint::origin()],
            &[CartesianPoint::origin()],
            8_000,
            &meta,
        )
        .unwrap();

        let reader = SofaReader::open(&path).unwrap();
        assert_eq!(reader.attribute("Conventions"), Some("SOFA"));
        assert_eq!(reader.attribute("Version"), Some("2.1"));
        assert_eq!(reader.attribute("SOFAConventions"), Some("SingleRoomSRIR"));
        assert_eq!(reader.attribute("SOFAConventionsVersion"), Some("1.0"));
        assert_eq!(reader.attribute("DataType"), Some("FIR"));
        assert_eq!(reader.attribute("RoomType"), Some("shoebox"));
        assert_eq!(reader.attribute("DatabaseName"), Some("test_db"));
        assert_eq!(reader.attribute("RoomShortName"), Some("anechoic"));
        assert_eq!(reader.attribute("ListenerShortName"), Some("em32"));
        assert_eq!(reader.attribute("Title"), Some("test_db - anechoic"));
        assert_eq!(reader.attribute("Comment"), Some("unit test"));
        assert!(reader.attribute("DateCreated").is_some());
        assert!(reader.attribute("DateModified").is_some());
    }

    #[test]
    fn test_data_ir_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.srir");
        write_srir(
            &path,
            &Array3::zeros((1, 1, 4)),
            &[CartesianPoint::origin()],
            &[CartesianPoint::origin()],
            8_000,
            &SofaMetadata::default(),
        )
        .unwrap();

        let reader = SofaReader::open(&path).unwrap();
        let ir = reader.variable(DATA_IR).unwrap();
        assert_eq!(ir.attribute("ChannelOrdering"), Some("acn"));
        assert_eq!(ir.attribute("Normalization"), Some("sn3d"));
    }

    #[test]
    fn test_extra_delay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delay.srir");
        let mut writer = SofaWriter::new(
            Array3::zeros((1, 2, 4)),
            vec![CartesianPoint::origin()],
            receiver_grid(2),
            8_000,
        );
        writer.set_extra_delay(vec![3.0, 7.0]);
        writer.finalize(&path).unwrap();

        let reader = SofaReader::open(&path).unwrap();
        assert_eq!(reader.variable(DATA_DELAY).unwrap().data, vec![3.0, 7.0]);
    }

    #[test]
    fn test_rejects_wrong_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.srir");
        std::fs::write(&path, b"WAVEfmt and then some longer nonsense payload").unwrap();
        assert!(matches!(
            SofaReader::open(&path),
            Err(SofaError::InvalidMagic)
        ));
    }

    #[test]
    fn test_detects_corrupted_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.srir");
        write_srir(
            &path,
            &Array3::zeros((1, 1, 16)),
            &[CartesianPoint::origin()],
            &[CartesianPoint::origin()],
            8_000,
            &SofaMetadata::default(),
        )
        .unwrap();

        // Flip a payload byte just past the header.
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[HEADER_SIZE + 2] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            SofaReader::open(&path),
            Err(SofaError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_variable_lookup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.srir");
        write_srir(
            &path,
            &Array3::zeros((1, 1, 4)),
            &[CartesianPoint::origin()],
            &[CartesianPoint::origin()],
            8_000,
            &SofaMetadata::default(),
        )
        .unwrap();
        let reader = SofaReader::open(&path).unwrap();
        assert!(matches!(
            reader.variable("Data.Nonexistent"),
            Err(SofaError::VariableNotFound(_))
        ));
    }
}
