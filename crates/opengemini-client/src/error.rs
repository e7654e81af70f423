//! Error and Result types for openGemini client operations.

use crate::record::FieldType;
use thiserror::Error;

/// A convenience `Result` type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// The error type for record encoding and the gRPC write path.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A decode would read past the end of the input buffer.
    #[error("Out of bounds: need {needed} bytes at offset {offset}, buffer holds {len}")]
    OutOfBounds {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Total length of the buffer.
        len: usize,
    },

    /// A decoded string was not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// A decoded field type tag does not name a known type.
    #[error("Unknown field type: {0}")]
    UnknownFieldType(i64),

    /// A record was requested from a transform that never saw a point.
    #[error("empty record")]
    EmptyRecord,

    /// A column name was reused with a different value type.
    #[error("Type conflict on column {column}: expected {expected}, got {actual}")]
    TypeConflict {
        /// Name of the column.
        column: String,
        /// Type fixed at the column's first observation.
        expected: FieldType,
        /// Type of the rejected value.
        actual: FieldType,
    },

    /// A tag or field used the reserved `time` column name.
    #[error("Reserved column name: {0}")]
    ReservedColumn(String),

    /// A column name does not fit the `u16` length prefix.
    #[error("Column name too long: {len} bytes, limit {max}")]
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Largest encodable name length.
        max: usize,
    },

    /// A point used the same name for a tag and a field.
    #[error("Column {0} is both a tag and a field")]
    DuplicateColumn(String),

    /// The transform has already produced its record.
    #[error("Record transform already finalized")]
    TransformFinalized,

    /// The record failed a structural check after decoding.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Client configuration or request arguments are invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The server answered a write with a non-success code.
    #[error("write_by_grpc error resp, code: {code}")]
    Write {
        /// Response code returned by the server.
        code: i32,
    },

    /// The transport collaborator failed to deliver a request.
    #[error("Transport error: {0}")]
    Transport(String),
}
