//! Encoded sizes of the primitive wire types.

/// Encoded size of an `i64`.
pub const SIZE_OF_INT64: usize = 8;
/// Encoded size of a `u16`.
pub const SIZE_OF_UINT16: usize = 2;
/// Encoded size of a `u32`.
pub const SIZE_OF_UINT32: usize = 4;
/// Encoded size of an `f64` column value.
pub const SIZE_OF_FLOAT64: usize = 8;
/// Encoded size of a `bool` column value.
pub const SIZE_OF_BOOL: usize = 1;

/// Longest string the `u16` length prefix can describe.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Encoded size of a length-prefixed string.
#[inline]
pub fn size_of_string(s: &str) -> usize {
    s.len() + SIZE_OF_UINT16
}

/// Encoded size of a length-prefixed byte blob.
#[inline]
pub fn size_of_bytes(b: &[u8]) -> usize {
    b.len() + SIZE_OF_UINT32
}

/// Encoded size of a count-prefixed `u32` list.
#[inline]
pub fn size_of_uint32_list(v: &[u32]) -> usize {
    v.len() * SIZE_OF_UINT32 + SIZE_OF_UINT32
}
