//! Append-style encoders for the primitive wire types.
//!
//! Scalars are written big-endian. Elements of a `u32` list are the one
//! exception: the count prefix is big-endian but every element is packed
//! little-endian, which the server expects.

use bytes::BufMut;

/// Appends an `i64` as 8 big-endian bytes with the sign folded into bit 0.
pub fn append_int64(buf: &mut Vec<u8>, v: i64) {
    let folded = ((v << 1) ^ (v >> 63)) as u64;
    buf.put_u64(folded);
}

/// Appends a big-endian `u16`.
pub fn append_uint16(buf: &mut Vec<u8>, v: u16) {
    buf.put_u16(v);
}

/// Appends a big-endian `u32`.
pub fn append_uint32(buf: &mut Vec<u8>, v: u32) {
    buf.put_u32(v);
}

/// Appends a `u16` length prefix followed by the UTF-8 bytes of `v`.
///
/// `v` must be at most [`MAX_STRING_LEN`](crate::codec::size::MAX_STRING_LEN)
/// bytes; callers check names before they reach the encoder.
pub fn append_string(buf: &mut Vec<u8>, v: &str) {
    append_uint16(buf, v.len() as u16);
    buf.put_slice(v.as_bytes());
}

/// Appends a `u32` length prefix followed by the raw bytes of `v`.
pub fn append_bytes(buf: &mut Vec<u8>, v: &[u8]) {
    append_uint32(buf, v.len() as u32);
    buf.put_slice(v);
}

/// Appends a `u32` count followed by each element as little-endian `u32`.
pub fn append_uint32_list(buf: &mut Vec<u8>, v: &[u32]) {
    append_uint32(buf, v.len() as u32);
    buf.reserve(v.len() * 4);
    for &x in v {
        buf.put_u32_le(x);
    }
}
