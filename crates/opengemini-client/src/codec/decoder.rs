//! Cursor-based decoder, the inverse of [`super::encoder`].

use crate::codec::size::{SIZE_OF_INT64, SIZE_OF_UINT16, SIZE_OF_UINT32};
use crate::error::{ClientError, Result};

/// Reads primitive wire values from a borrowed buffer, advancing an offset.
///
/// A read that would run past the end of the buffer fails with
/// [`ClientError::OutOfBounds`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct BinaryDecoder<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BinaryDecoder<'a> {
    /// Creates a decoder positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Returns true once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        if needed > self.remaining() {
            return Err(ClientError::OutOfBounds {
                offset: self.offset,
                needed,
                len: self.buf.len(),
            });
        }
        let out = &self.buf[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads a sign-folded big-endian `i64`.
    pub fn int64(&mut self) -> Result<i64> {
        let raw = u64::from_be_bytes(self.take_array::<SIZE_OF_INT64>()?);
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    /// Reads a big-endian `u16`.
    pub fn uint16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take_array::<SIZE_OF_UINT16>()?))
    }

    /// Reads a big-endian `u32`.
    pub fn uint32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_array::<SIZE_OF_UINT32>()?))
    }

    /// Reads a `u16`-prefixed UTF-8 string.
    pub fn string(&mut self) -> Result<&'a str> {
        let start = self.offset;
        let len = self.uint16()? as usize;
        let raw = match self.take(len) {
            Ok(raw) => raw,
            Err(e) => {
                self.offset = start;
                return Err(e);
            }
        };
        std::str::from_utf8(raw).map_err(|e| {
            self.offset = start;
            ClientError::InvalidUtf8(e.to_string())
        })
    }

    /// Reads a `u32`-prefixed byte blob.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let start = self.offset;
        let len = self.uint32()? as usize;
        if len == 0 {
            return Ok(&[]);
        }
        self.take(len).map_err(|e| {
            self.offset = start;
            e
        })
    }

    /// Reads a `u32`-counted list of little-endian `u32` elements.
    pub fn uint32_list(&mut self) -> Result<Vec<u32>> {
        let start = self.offset;
        let count = self.uint32()? as usize;
        if count == 0 {
            return Ok(Vec::new());
        }
        let needed = count.checked_mul(SIZE_OF_UINT32).unwrap_or(usize::MAX);
        let raw = match self.take(needed) {
            Ok(raw) => raw,
            Err(e) => {
                self.offset = start;
                return Err(e);
            }
        };
        Ok(raw
            .chunks_exact(SIZE_OF_UINT32)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}
