//! Sequential byte reader/writer for FMS data
//!
//! Thin wrappers over `std::io::Cursor` and `Vec<u8>` that turn short reads
//! into [`Error::Truncated`] instead of generic IO errors.

use super::align_up;
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Reads little-endian fields and NUL-terminated strings from a buffer
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current offset from the start of the buffer
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Total length of the buffer
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Bytes left after the current position
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(Error::Truncated {
                offset: self.position(),
                needed: needed - remaining,
            });
        }
        Ok(())
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    /// Read a 4-byte magic word
    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        self.ensure(4)?;
        let mut magic = [0u8; 4];
        self.cursor.read_exact(&mut magic)?;
        Ok(magic)
    }

    /// Read raw bytes up to (not including) the next NUL, then skip the NUL.
    ///
    /// The terminator must occur before `limit`; otherwise the string is truncated.
    pub fn read_null_terminated(&mut self, limit: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.position();
        let end = limit.min(data.len()).max(start);

        let Some(len) = data[start..end].iter().position(|&b| b == 0) else {
            return Err(Error::Truncated {
                offset: end,
                needed: 1,
            });
        };

        self.cursor.set_position((start + len + 1) as u64);
        Ok(&data[start..start + len])
    }

    /// Read a NUL-terminated UTF-8 string that must end before `limit`.
    ///
    /// `index` is the string's position in the table, used for error reporting.
    pub fn read_null_terminated_utf8(&mut self, limit: usize, index: usize) -> Result<String> {
        let bytes = self.read_null_terminated(limit)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::InvalidUtf8 { index })
    }

    /// Skip zero padding up to the next 16-byte boundary
    pub fn skip_alignment_padding(&mut self) -> Result<()> {
        let start = self.position();
        let padding = align_up(start) - start;
        self.ensure(padding)?;

        let data = self.cursor.get_ref();
        if let Some(pos) = data[start..start + padding].iter().position(|&b| b != 0) {
            return Err(Error::NonZeroPadding { offset: start + pos });
        }

        self.cursor.set_position((start + padding) as u64);
        Ok(())
    }
}

/// Writes little-endian fields and NUL-terminated strings into a growable buffer
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    #[must_use]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_magic(&mut self, magic: [u8; 4]) -> Result<()> {
        self.buffer.write_all(&magic)?;
        Ok(())
    }

    /// Write the UTF-8 bytes of `text` and a NUL terminator.
    ///
    /// `index` is the string's position in the document, used for error reporting.
    pub fn write_null_terminated_utf8(&mut self, text: &str, index: usize) -> Result<()> {
        if text.as_bytes().contains(&0) {
            return Err(Error::InvalidStringContent { index });
        }
        self.buffer.write_all(text.as_bytes())?;
        self.buffer.write_u8(0)?;
        Ok(())
    }

    /// Pad with zeros up to the next 16-byte boundary
    pub fn align_pad_to_16(&mut self) {
        self.buffer.resize(align_up(self.buffer.len()), 0);
    }

    /// Overwrite a previously written u32 at `offset`
    pub fn patch_u32_le(&mut self, offset: usize, value: u32) {
        LittleEndian::write_u32(&mut self.buffer[offset..offset + 4], value);
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
