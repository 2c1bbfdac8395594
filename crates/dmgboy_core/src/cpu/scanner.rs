use crate::error::{GbError, Result};

/// Anything the decoder can pull instruction bytes from.
pub trait ByteSource {
    fn byte_at(&self, position: usize) -> Result<u8>;
}

impl ByteSource for [u8] {
    fn byte_at(&self, position: usize) -> Result<u8> {
        self.get(position)
            .copied()
            .ok_or(GbError::EndOfStream { position })
    }
}

impl ByteSource for Vec<u8> {
    fn byte_at(&self, position: usize) -> Result<u8> {
        self.as_slice().byte_at(position)
    }
}

/// A cursor over a [`ByteSource`].
///
/// Lookahead (`peek`) never moves the cursor; `read_*` consume.
pub struct ByteScanner<'a> {
    source: &'a dyn ByteSource,
    position: usize,
}

impl<'a> ByteScanner<'a> {
    pub fn new(source: &'a dyn ByteSource, position: usize) -> Self {
        Self { source, position }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Move the cursor relative to where it is. Saturates at zero.
    #[inline]
    pub fn seek_offset(&mut self, delta: isize) {
        self.position = self.position.saturating_add_signed(delta);
    }

    pub fn peek(&self) -> Result<u8> {
        self.source.byte_at(self.position)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek()?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Little-endian: low byte first.
    pub fn read_u16(&mut self) -> Result<u16> {
        let low = self.read_u8()?;
        let high = self.read_u8()?;
        Ok(u16::from_le_bytes([low, high]))
    }
}
