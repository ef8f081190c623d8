use crate::error::{FileError, Result};

/// Little-endian cursor over a byte buffer.
///
/// Every reader is tagged with the name of the object being decoded so a
/// read past the end surfaces as `TruncatedObject` for that object.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    object: &'static str,
}

impl<'a> Reader<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8], object: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            object,
        }
    }

    #[inline]
    pub fn new_at(bytes: &'a [u8], pos: usize, object: &'static str) -> Self {
        Self { bytes, pos, object }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if self.pos.checked_add(n).is_some_and(|end| end <= self.bytes.len()) {
            Ok(())
        } else {
            Err(FileError::TruncatedObject {
                object: self.object,
            })
        }
    }

    #[inline]
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.need(n)?;
        self.pos += n;
        Ok(())
    }

    #[inline]
    pub fn read_arr<const N: usize>(&mut self) -> Result<[u8; N]> {
        let v: [u8; N] = self.take(N)?.try_into().unwrap();
        Ok(v)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_arr::<2>()?))
    }

    #[inline]
    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_arr::<2>()?))
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_arr::<4>()?))
    }

    #[inline]
    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_arr::<4>()?))
    }

    #[inline]
    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_arr::<8>()?))
    }

    #[inline]
    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_arr::<4>()?))
    }

    #[inline]
    pub fn read_f64_le(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_arr::<8>()?))
    }

    /// Read a `u16` character-count prefix followed by that many UTF-16LE
    /// code units. No NUL terminator on disk. `None` when the prefix or the
    /// declared characters run past the end; the cursor is unchanged in
    /// that case so callers can decide severity.
    pub fn read_utf16_string(&mut self) -> Option<String> {
        if self.remaining() < 2 {
            return None;
        }
        let len = u16::from_le_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]) as usize;
        if len > (self.remaining() - 2) / 2 {
            return None;
        }
        self.pos += 2;
        let raw = &self.bytes[self.pos..self.pos + 2 * len];
        self.pos += 2 * len;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        Some(String::from_utf16_lossy(&units))
    }
}
