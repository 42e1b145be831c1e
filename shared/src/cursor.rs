//! Sequential little-endian reader over an immutable byte buffer

use crate::error::ReadError;
use crate::{MAGIC_LEN, bits};

/// Upper bound on items reserved up front by [`ByteCursor::repeat`]
const MAX_PREALLOC: usize = 256;

/// Bounds-checked cursor over a borrowed byte slice.
///
/// Every read advances the position by exactly the width it consumed. A read
/// that would run past the end fails with [`ReadError::OutOfBounds`] and
/// leaves the position untouched.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once every byte has been consumed.
    ///
    /// Readers only use this for diagnostics (trailing data is logged, not
    /// rejected).
    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        if self.remaining() < n {
            return Err(ReadError::OutOfBounds {
                offset: self.pos,
                wanted: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    /// Borrow the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32, ReadError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read `n` single-byte characters.
    ///
    /// Each byte maps to the code point with the same value, so names with
    /// bytes above 0x7F survive without a UTF-8 validity check.
    pub fn read_fixed_chars(&mut self, n: usize) -> Result<String, ReadError> {
        Ok(self.take(n)?.iter().map(|&b| char::from(b)).collect())
    }

    /// Read a u32 character count followed by that many characters
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let len = self.read_u32_le()? as usize;
        self.read_fixed_chars(len)
    }

    /// Consume a 4-byte tag and check it against `magic`
    pub fn expect_magic(&mut self, magic: &[u8; MAGIC_LEN]) -> Result<(), ReadError> {
        let found = self.read_fixed_chars(MAGIC_LEN)?;
        if found.as_bytes() != magic {
            return Err(ReadError::BadMagic {
                expected: String::from_utf8_lossy(magic).into_owned(),
                found,
            });
        }
        Ok(())
    }

    /// Read a little-endian u32 and split it into fields of the given
    /// widths, least-significant field first.
    pub fn read_bit_fields(&mut self, widths: &[u32]) -> Result<Vec<u32>, ReadError> {
        let word = self.read_u32_le()?;
        Ok(bits::unpack_bit_fields(word, widths))
    }

    /// Run `f` `count` times, collecting the results in order.
    ///
    /// `f` receives the cursor and the zero-based iteration index. The first
    /// error stops the loop and is returned as-is.
    pub fn repeat<T, E>(
        &mut self,
        count: usize,
        mut f: impl FnMut(&mut Self, usize) -> Result<T, E>,
    ) -> Result<Vec<T>, E> {
        // Counts come straight from the file; reserve a bounded amount and
        // let a corrupt count run into the end of the buffer instead.
        let mut out = Vec::with_capacity(count.min(MAX_PREALLOC));
        for index in 0..count {
            out.push(f(self, index)?);
        }
        Ok(out)
    }
}
