use std::fs::File;
use std::io::{self, Cursor, Seek, SeekFrom, Write};

use crate::format::tiff::ByteOrder;

/// A seekable byte sink whose length can be set explicitly.
///
/// This is the seam between the TIFF writer and whatever it writes to. The
/// writer needs absolute-position writes and the ability to crop a
/// pre-existing file, which `Write + Seek` alone cannot express.
pub trait OutputTarget: Write + Seek {
    /// Truncate or extend the target to exactly `len` bytes.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl OutputTarget for File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

impl OutputTarget for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

impl<T: OutputTarget + ?Sized> OutputTarget for &mut T {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len)
    }
}

// =============================================================================
// TiffOutputStream
// =============================================================================

/// Binary output stream with a byte order fixed for the whole file.
///
/// TIFF allows either byte order, but it is chosen once in the header and
/// every multi-byte value written afterwards must follow it.
pub struct TiffOutputStream<W: OutputTarget> {
    inner: W,
    byte_order: ByteOrder,
}

impl<W: OutputTarget> TiffOutputStream<W> {
    /// Wrap an output target.
    pub fn new(inner: W, byte_order: ByteOrder) -> Self {
        Self { inner, byte_order }
    }

    /// The byte order used for all multi-byte writes.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Move the cursor to an absolute position.
    pub fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Current absolute cursor position.
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// Total length of the underlying target. The cursor is left unchanged.
    pub fn length(&mut self) -> io::Result<u64> {
        let pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        if pos != len {
            self.inner.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }

    /// Truncate or extend the target to exactly `len` bytes.
    pub fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.inner.flush()?;
        self.inner.set_len(len)
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        let bytes = match self.byte_order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)
    }

    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        let bytes = match self.byte_order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)
    }

    pub fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Write a raw byte run at the current position.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Borrow the underlying target.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the stream, returning the underlying target.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
