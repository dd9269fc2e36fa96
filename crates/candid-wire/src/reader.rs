//! Bounds-checked byte cursor.

use crate::error::{Error, Result};

/// Cursor over an input buffer. Every read checks the remaining length.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8().ok_or(Error::UnexpectedEof {
            offset: self.offset,
        })?;
        self.offset += 1;
        Ok(byte)
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let eof = Error::UnexpectedEof {
            offset: self.offset,
        };
        let end = self.offset.checked_add(len).ok_or(eof.clone())?;
        let slice = self.bytes.get(self.offset..end).ok_or(eof)?;
        self.offset = end;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
