//! Columnar records for the gRPC write path.
//!
//! A [`Record`] is the self-describing binary block sent to the server for
//! one measurement. Its wire layout is:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Field Count: u32                             │
//! │  Fields (repeated)                            │
//! │  - Size: u32                                  │
//! │  - Name: string, Type: int64                  │
//! ├───────────────────────────────────────────────┤
//! │  ColVal Count: u32                            │
//! │  ColVals (repeated)                           │
//! │  - Size: u32                                  │
//! │  - Len, NilCount, BitmapOffset: int64         │
//! │  - Val: bytes, Bitmap: bytes                  │
//! │  - Offset: uint32 list                        │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Every sub-block is size-prefixed, so a decoder can skip what it does not
//! understand. Columns are ordered value fields first, then tags, then the
//! reserved [`TIME_FIELD`].

pub mod colval;
pub mod field;
pub mod transform;

pub use colval::ColVal;
pub use field::{Field, FieldType};
pub use transform::{Column, RecordTransform};

use crate::codec::size::{MAX_STRING_LEN, SIZE_OF_UINT32};
use crate::codec::{append_uint32, BinaryDecoder};
use crate::error::{ClientError, Result};

/// Name of the reserved timestamp column.
pub const TIME_FIELD: &str = "time";

/// Index-aligned column descriptors and column values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Column descriptors; `fields[i]` describes `col_vals[i]`.
    pub fields: Vec<Field>,
    /// Column values.
    pub col_vals: Vec<ColVal>,
}

impl Record {
    /// Creates a record from aligned fields and columns.
    pub fn new(fields: Vec<Field>, col_vals: Vec<ColVal>) -> Self {
        Self { fields, col_vals }
    }

    /// Number of rows, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.col_vals.first().map(ColVal::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<(&Field, &ColVal)> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .and_then(|i| Some((&self.fields[i], self.col_vals.get(i)?)))
    }

    /// Checks that fields and columns are aligned and equally long.
    pub fn validate(&self) -> Result<()> {
        if self.fields.len() != self.col_vals.len() {
            return Err(ClientError::MalformedRecord(format!(
                "{} fields but {} columns",
                self.fields.len(),
                self.col_vals.len()
            )));
        }
        if let Some(field) = self.fields.iter().find(|f| f.name.len() > MAX_STRING_LEN) {
            return Err(ClientError::NameTooLong {
                len: field.name.len(),
                max: MAX_STRING_LEN,
            });
        }
        let rows = self.row_count();
        if let Some((field, col)) = self
            .fields
            .iter()
            .zip(&self.col_vals)
            .find(|(_, col)| col.len() != rows)
        {
            return Err(ClientError::MalformedRecord(format!(
                "column {} has {} rows, expected {}",
                field.name,
                col.len(),
                rows
            )));
        }
        Ok(())
    }

    /// Appends the record's wire form to `buf`.
    ///
    /// Column names are written with a `u16` length prefix; run
    /// [`Record::validate`] first on hand-built records.
    pub fn marshal(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.codec_size());

        append_uint32(buf, self.fields.len() as u32);
        for field in &self.fields {
            append_uint32(buf, field.codec_size() as u32);
            field.marshal(buf);
        }

        append_uint32(buf, self.col_vals.len() as u32);
        for col in &self.col_vals {
            append_uint32(buf, col.codec_size() as u32);
            col.marshal(buf);
        }
    }

    /// Returns the record's wire form as a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.codec_size());
        self.marshal(&mut buf);
        buf
    }

    /// Decodes and validates a record.
    ///
    /// Empty input yields an empty record.
    pub fn unmarshal(buf: &[u8]) -> Result<Self> {
        if buf.is_empty() {
            return Ok(Self::default());
        }
        let mut dec = BinaryDecoder::new(buf);

        let field_count = dec.uint32()? as usize;
        let mut fields = Vec::with_capacity(field_count.min(dec.remaining()));
        for _ in 0..field_count {
            fields.push(Field::unmarshal(dec.bytes()?)?);
        }

        let col_count = dec.uint32()? as usize;
        let mut col_vals = Vec::with_capacity(col_count.min(dec.remaining()));
        for _ in 0..col_count {
            col_vals.push(ColVal::unmarshal(dec.bytes()?)?);
        }

        let record = Self { fields, col_vals };
        record.validate()?;
        Ok(record)
    }

    /// Exact length of [`Record::marshal`] output.
    pub fn codec_size(&self) -> usize {
        let fields: usize = self
            .fields
            .iter()
            .map(|f| SIZE_OF_UINT32 + f.codec_size())
            .sum();
        let cols: usize = self
            .col_vals
            .iter()
            .map(|c| SIZE_OF_UINT32 + c.codec_size())
            .sum();
        SIZE_OF_UINT32 + fields + SIZE_OF_UINT32 + cols
    }
}
