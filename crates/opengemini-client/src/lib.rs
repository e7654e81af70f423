//! openGemini client - columnar record encoding and gRPC writes
//!
//! This crate turns row-oriented points into the columnar, null-aware binary
//! records accepted by the openGemini gRPC write service.
//!
//! # Components
//!
//! - [`codec`]: primitive wire encoders and the [`BinaryDecoder`] cursor
//! - [`ColVal`] / [`Field`] / [`Record`]: columnar blocks and their wire format
//! - [`RecordTransform`]: schema unification across heterogeneous points
//! - [`write`]: request envelope, transport seam and [`RecordWriter`]
//!
//! # Example
//!
//! ```rust
//! use opengemini_client::{Point, Record, RecordTransform};
//!
//! let mut transform = RecordTransform::new();
//! transform.add_point(
//!     &Point::new("weather")
//!         .with_tag("loc", "sz")
//!         .with_field("v", 1i64)
//!         .with_time(1_700_000_000_000_000_000),
//! )?;
//!
//! let record = transform.convert_to_record()?;
//! let bytes = record.to_bytes();
//! assert_eq!(Record::unmarshal(&bytes)?, record);
//! # Ok::<(), opengemini_client::ClientError>(())
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod error;
pub mod point;
pub mod record;
pub mod write;

pub use codec::BinaryDecoder;
pub use error::{ClientError, Result};
pub use point::{BatchPoints, FieldValue, Point, Precision};
pub use record::{ColVal, Column, Field, FieldType, Record, RecordTransform, TIME_FIELD};
pub use write::{
    build_write_request, check_response, GrpcConfig, RecordWriter, WriteRequest, WriteResponse,
    WriteService,
};
