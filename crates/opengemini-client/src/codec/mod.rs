//! Binary primitive codec for the columnar record wire format.
//!
//! ## Wire Types
//!
//! ```text
//! int64        8 bytes, big-endian, sign folded into bit 0
//! uint16       2 bytes, big-endian
//! uint32       4 bytes, big-endian
//! string       uint16 length + UTF-8 bytes
//! bytes        uint32 length + raw bytes
//! uint32 list  uint32 count + count × 4 bytes little-endian
//! ```
//!
//! Encoders append to a caller-owned `Vec<u8>`; [`BinaryDecoder`] walks a
//! borrowed slice and never reads past its end.

pub mod decoder;
pub mod encoder;
pub mod size;

pub use decoder::BinaryDecoder;
pub use encoder::{
    append_bytes, append_int64, append_string, append_uint16, append_uint32, append_uint32_list,
};
pub use size::{size_of_bytes, size_of_string, size_of_uint32_list};
