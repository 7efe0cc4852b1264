//! Bounds-checked big-endian reader for raw font tables

/// Raw table read error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of table at offset {0}")]
    UnexpectedEof(usize),
}

/// Binary reader with bounds checking
pub struct FontReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FontReader<'a> {
    /// Create a new reader
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get current position
    pub fn pos(&self) -> usize {
        self.pos
    }

    fn ensure(&self, n: usize) -> Result<(), ReadError> {
        if self.pos + n > self.data.len() {
            return Err(ReadError::UnexpectedEof(self.pos));
        }
        Ok(())
    }

    /// Skip bytes
    pub fn skip(&mut self, n: usize) -> Result<(), ReadError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read u8
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read big-endian u16
    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.ensure(2)?;
        let v = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Read bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Remaining bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}
