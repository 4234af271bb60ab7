//! Bounds-checked little-endian reader over a byte slice
//!
//! Every read checks the remaining length first and leaves the position
//! untouched when it fails, so a short buffer can never cause a panic or a
//! partial advance.

use byteorder::{ByteOrder, LittleEndian as LE};
use memchr::memchr;

use crate::{Error, Result};

/// Sequential reader for XTF structures
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the slice
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the slice
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move to an absolute offset (the end of the slice is a valid target)
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::DataTooShort {
                needed: offset,
                actual: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Skip over `n` unused bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < n {
            return Err(Error::DataTooShort {
                needed: n,
                actual: available,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LE::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LE::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LE::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LE::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LE::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LE::read_f64(self.take(8)?))
    }

    /// Borrow the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read a fixed-width character block, dropping the NUL padding
    pub fn read_chars(&mut self, n: usize) -> Result<String> {
        self.take(n).map(fixed_str)
    }
}

/// Decode a NUL-padded character block
///
/// The text ends at the first NUL. Invalid UTF-8 is replaced rather than
/// rejected, since writers are free to put any byte in these fields.
pub(crate) fn fixed_str(bytes: &[u8]) -> String {
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
