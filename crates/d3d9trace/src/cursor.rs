use std::io::{Read, Seek, SeekFrom};

use crate::error::{Result, TraceReadError};

/// Bounded, fallible sequential reader over a trace byte stream.
///
/// The total input length is captured up front so that untrusted offsets and
/// length fields can be validated before any read or allocation (lengths in
/// the file come straight from the input bytes). A read past the end is
/// always `TruncatedInput` and a seek past the end is always
/// `InvalidOffset`; there are no silent partial reads.
pub struct ByteCursor<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    /// Total input length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Repositions to an absolute offset. Callers must check for the
    /// format's "section absent" sentinel (offset 0) themselves; this only
    /// rejects offsets beyond the input.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(TraceReadError::InvalidOffset {
                offset,
                len: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Fills `buf` exactly or fails with `TruncatedInput`.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let pos = self.position()?;
        let available = self.len.saturating_sub(pos);
        if (buf.len() as u64) > available {
            return Err(TraceReadError::TruncatedInput {
                needed: buf.len(),
                available,
            });
        }
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Advances past `n` bytes without retaining them (padding and inline
    /// payload discard). Fails with `TruncatedInput` if fewer remain.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        let pos = self.position()?;
        let available = self.len.saturating_sub(pos);
        if n > available {
            return Err(TraceReadError::TruncatedInput {
                needed: usize::try_from(n).unwrap_or(usize::MAX),
                available,
            });
        }
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
}
