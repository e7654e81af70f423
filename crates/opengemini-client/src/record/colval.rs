//! Column value container.
//!
//! A [`ColVal`] stores one column as three buffers:
//!
//! - `val`: packed value bytes. Fixed-width types take 8 bytes (int64,
//!   float64) or 1 byte (bool) per non-null row; strings are raw UTF-8
//!   laid back to back.
//! - `bitmap`: validity bits, LSB first within each byte. Bit
//!   `i + bitmap_offset` is 1 iff row `i` holds a value.
//! - `offset`: for string columns, the start of every row's slot in `val`.
//!   Null rows still get an entry, pointing at the end of `val`.
//!
//! Nulls write no value bytes, so the `k`-th fixed-width value in `val`
//! belongs to the `k`-th valid row.

use crate::codec::size::{
    size_of_bytes, size_of_uint32_list, SIZE_OF_BOOL, SIZE_OF_FLOAT64, SIZE_OF_INT64,
};
use crate::codec::{append_bytes, append_int64, append_uint32_list, BinaryDecoder};
use crate::error::{ClientError, Result};
use bitvec::prelude::*;
use bytes::BufMut;

const BIT_MASK: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];
const FLIPPED_BIT_MASK: [u8; 8] = [254, 253, 251, 247, 239, 223, 191, 127];

/// Packed values, validity bitmap and string offsets of one column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColVal {
    /// Packed value bytes.
    pub val: Vec<u8>,
    /// Start offset into `val` of every string row.
    pub offset: Vec<u32>,
    /// Bit-packed validity map.
    pub bitmap: Vec<u8>,
    /// Bit position of row 0 within `bitmap`.
    pub bitmap_offset: usize,
    /// Number of rows, nulls included.
    pub len: usize,
    /// Number of null rows.
    pub nil_count: usize,
}

impl ColVal {
    /// Creates an empty column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows, nulls included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no rows have been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of null rows.
    pub fn nil_count(&self) -> usize {
        self.nil_count
    }

    fn bit_position(&self) -> (usize, usize) {
        let index = self.len + self.bitmap_offset;
        (index >> 3, index & 0x07)
    }

    fn grow_bitmap(&mut self, byte: usize) {
        if byte >= self.bitmap.len() {
            self.bitmap.resize(byte + 1, 0);
        }
    }

    fn set_bitmap(&mut self) {
        let (byte, bit) = self.bit_position();
        self.grow_bitmap(byte);
        self.bitmap[byte] |= BIT_MASK[bit];
    }

    fn reset_bitmap(&mut self) {
        let (byte, bit) = self.bit_position();
        self.grow_bitmap(byte);
        self.bitmap[byte] &= FLIPPED_BIT_MASK[bit];
    }

    fn append_null(&mut self) {
        self.reset_bitmap();
        self.len += 1;
        self.nil_count += 1;
    }

    fn commit_value(&mut self) {
        self.set_bitmap();
        self.len += 1;
    }

    /// Appends an integer row.
    pub fn append_integer(&mut self, v: i64) {
        self.val.put_i64_le(v);
        self.commit_value();
    }

    /// Appends a null integer row.
    pub fn append_integer_null(&mut self) {
        self.append_null();
    }

    /// Appends `count` null integer rows.
    pub fn append_integer_nulls(&mut self, count: usize) {
        for _ in 0..count {
            self.append_integer_null();
        }
    }

    /// Appends a float row.
    pub fn append_float(&mut self, v: f64) {
        self.val.put_f64_le(v);
        self.commit_value();
    }

    /// Appends a null float row.
    pub fn append_float_null(&mut self) {
        self.append_null();
    }

    /// Appends `count` null float rows.
    pub fn append_float_nulls(&mut self, count: usize) {
        for _ in 0..count {
            self.append_float_null();
        }
    }

    /// Appends a boolean row.
    pub fn append_boolean(&mut self, v: bool) {
        self.val.put_u8(u8::from(v));
        self.commit_value();
    }

    /// Appends a null boolean row.
    pub fn append_boolean_null(&mut self) {
        self.append_null();
    }

    /// Appends `count` null boolean rows.
    pub fn append_boolean_nulls(&mut self, count: usize) {
        for _ in 0..count {
            self.append_boolean_null();
        }
    }

    /// Appends a string row.
    pub fn append_string(&mut self, v: &str) {
        self.offset.push(self.val.len() as u32);
        self.val.put_slice(v.as_bytes());
        self.commit_value();
    }

    /// Appends a null string row, which still takes an offset slot.
    pub fn append_string_null(&mut self) {
        self.offset.push(self.val.len() as u32);
        self.append_null();
    }

    /// Appends `count` null string rows.
    pub fn append_string_nulls(&mut self, count: usize) {
        for _ in 0..count {
            self.append_string_null();
        }
    }

    fn bits(&self) -> &BitSlice<u8, Lsb0> {
        self.bitmap.view_bits::<Lsb0>()
    }

    /// Returns true if row `i` holds a value.
    pub fn is_valid(&self, i: usize) -> bool {
        i < self.len
            && self
                .bits()
                .get(i + self.bitmap_offset)
                .map(|bit| *bit)
                .unwrap_or(false)
    }

    /// Iterates the validity of every row in order.
    pub fn validity(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.is_valid(i))
    }

    /// Number of valid rows before row `i`.
    fn value_index(&self, i: usize) -> usize {
        let start = self.bitmap_offset.min(self.bits().len());
        let end = (self.bitmap_offset + i).min(self.bits().len());
        self.bits()[start..end].count_ones()
    }

    fn fixed_slot(&self, i: usize, width: usize) -> Option<&[u8]> {
        if !self.is_valid(i) {
            return None;
        }
        let start = self.value_index(i) * width;
        self.val.get(start..start + width)
    }

    /// Reads row `i` of an integer column.
    pub fn integer_value(&self, i: usize) -> Option<i64> {
        let raw = self.fixed_slot(i, SIZE_OF_INT64)?;
        let mut le = [0u8; SIZE_OF_INT64];
        le.copy_from_slice(raw);
        Some(i64::from_le_bytes(le))
    }

    /// Reads row `i` of a float column.
    pub fn float_value(&self, i: usize) -> Option<f64> {
        let raw = self.fixed_slot(i, SIZE_OF_FLOAT64)?;
        let mut le = [0u8; SIZE_OF_FLOAT64];
        le.copy_from_slice(raw);
        Some(f64::from_le_bytes(le))
    }

    /// Reads row `i` of a boolean column.
    pub fn boolean_value(&self, i: usize) -> Option<bool> {
        self.fixed_slot(i, SIZE_OF_BOOL).map(|raw| raw[0] != 0)
    }

    /// Reads row `i` of a string or tag column.
    pub fn string_value(&self, i: usize) -> Option<&str> {
        if !self.is_valid(i) {
            return None;
        }
        let start = *self.offset.get(i)? as usize;
        let end = self
            .offset
            .get(i + 1)
            .map(|&o| o as usize)
            .unwrap_or(self.val.len());
        std::str::from_utf8(self.val.get(start..end)?).ok()
    }

    /// Appends the column in wire order: len, nil count, bitmap offset,
    /// values, bitmap, string offsets.
    pub fn marshal(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.codec_size());
        append_int64(buf, self.len as i64);
        append_int64(buf, self.nil_count as i64);
        append_int64(buf, self.bitmap_offset as i64);
        append_bytes(buf, &self.val);
        append_bytes(buf, &self.bitmap);
        append_uint32_list(buf, &self.offset);
    }

    /// Decodes a column from its marshaled bytes.
    ///
    /// Empty input yields an empty column.
    pub fn unmarshal(buf: &[u8]) -> Result<Self> {
        if buf.is_empty() {
            return Ok(Self::default());
        }
        let mut dec = BinaryDecoder::new(buf);
        let len = decode_count(dec.int64()?, "len")?;
        let nil_count = decode_count(dec.int64()?, "nil count")?;
        let bitmap_offset = decode_count(dec.int64()?, "bitmap offset")?;
        let val = dec.bytes()?.to_vec();
        let bitmap = dec.bytes()?.to_vec();
        let offset = dec.uint32_list()?;

        if nil_count > len {
            return Err(ClientError::MalformedRecord(format!(
                "nil count {} exceeds len {}",
                nil_count, len
            )));
        }

        Ok(Self {
            val,
            offset,
            bitmap,
            bitmap_offset,
            len,
            nil_count,
        })
    }

    /// Exact length of [`ColVal::marshal`] output.
    pub fn codec_size(&self) -> usize {
        3 * SIZE_OF_INT64
            + size_of_bytes(&self.val)
            + size_of_bytes(&self.bitmap)
            + size_of_uint32_list(&self.offset)
    }
}

fn decode_count(v: i64, what: &str) -> Result<usize> {
    usize::try_from(v)
        .map_err(|_| ClientError::MalformedRecord(format!("negative {}: {}", what, v)))
}
