//! Column descriptors.

use crate::codec::size::{size_of_string, SIZE_OF_INT64};
use crate::codec::{append_int64, append_string, BinaryDecoder};
use crate::error::{ClientError, Result};
use std::fmt;

/// Semantic type of a record column.
///
/// The discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i64)]
pub enum FieldType {
    /// Type not set.
    #[default]
    Unknown = 0,
    /// Signed 64-bit integer.
    Int = 1,
    /// Unsigned 64-bit integer.
    UInt = 2,
    /// 64-bit float.
    Float = 3,
    /// UTF-8 string.
    String = 4,
    /// Boolean.
    Boolean = 5,
    /// Indexed string dimension.
    Tag = 6,
    /// Sentinel past the last valid type.
    Last = 7,
}

impl FieldType {
    /// Creates a FieldType from its wire value.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Int),
            2 => Some(Self::UInt),
            3 => Some(Self::Float),
            4 => Some(Self::String),
            5 => Some(Self::Boolean),
            6 => Some(Self::Tag),
            7 => Some(Self::Last),
            _ => None,
        }
    }

    /// Returns true for types whose values live in the string offset table.
    pub fn is_string_like(self) -> bool {
        matches!(self, Self::String | Self::Tag)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Tag => "tag",
            Self::Last => "last",
        };
        f.write_str(name)
    }
}

/// Name and type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    /// Column type.
    pub field_type: FieldType,
    /// Column name.
    pub name: String,
}

impl Field {
    /// Creates a field descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_type,
            name: name.into(),
        }
    }

    /// Returns true if this column holds tag values.
    pub fn is_tag(&self) -> bool {
        self.field_type == FieldType::Tag
    }

    /// Appends the name then the type tag.
    pub fn marshal(&self, buf: &mut Vec<u8>) {
        append_string(buf, &self.name);
        append_int64(buf, self.field_type as i64);
    }

    /// Decodes a field from its marshaled bytes.
    ///
    /// Empty input yields the default field.
    pub fn unmarshal(buf: &[u8]) -> Result<Self> {
        if buf.is_empty() {
            return Ok(Self::default());
        }
        let mut dec = BinaryDecoder::new(buf);
        let name = dec.string()?.to_owned();
        let raw = dec.int64()?;
        let field_type = FieldType::from_i64(raw).ok_or(ClientError::UnknownFieldType(raw))?;
        Ok(Self { field_type, name })
    }

    /// Exact length of [`Field::marshal`] output.
    pub fn codec_size(&self) -> usize {
        size_of_string(&self.name) + SIZE_OF_INT64
    }
}
