//! TIFF byte order and file header.
//!
//! # TIFF Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! The writer places the first IFD at offset 10, leaving two zero bytes of
//! padding after the 8-byte header.

use bytes::BufMut;

use crate::error::TiffError;
use crate::io::{OutputTarget, TiffOutputStream};

// =============================================================================
// Constants
// =============================================================================

/// Version number for classic TIFF
pub const TIFF_MAGIC: u16 = 42;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: u64 = 8;

/// Offset of the first (and only) IFD written by this crate
pub const DEFAULT_FIRST_IFD_OFFSET: u32 = 10;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF file.
///
/// Selected once in the header; every multi-byte value in the file follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Big-endian ("MM" = Motorola)
    #[default]
    BigEndian,
    /// Little-endian ("II" = Intel)
    LittleEndian,
}

impl ByteOrder {
    /// The two marker bytes that open the file.
    #[inline]
    pub const fn magic(self) -> [u8; 2] {
        match self {
            ByteOrder::BigEndian => *b"MM",
            ByteOrder::LittleEndian => *b"II",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ByteOrder::BigEndian => "big-endian",
            ByteOrder::LittleEndian => "little-endian",
        }
    }

    #[inline]
    pub fn put_u16(self, buf: &mut impl BufMut, value: u16) {
        match self {
            ByteOrder::BigEndian => buf.put_u16(value),
            ByteOrder::LittleEndian => buf.put_u16_le(value),
        }
    }

    #[inline]
    pub fn put_u32(self, buf: &mut impl BufMut, value: u32) {
        match self {
            ByteOrder::BigEndian => buf.put_u32(value),
            ByteOrder::LittleEndian => buf.put_u32_le(value),
        }
    }

    #[inline]
    pub fn put_f32(self, buf: &mut impl BufMut, value: f32) {
        match self {
            ByteOrder::BigEndian => buf.put_f32(value),
            ByteOrder::LittleEndian => buf.put_f32_le(value),
        }
    }
}

/// Decoding counterparts of the `put_*` methods, used to check encoded bytes.
#[cfg(test)]
impl ByteOrder {
    pub(crate) fn read_u16(self, mut bytes: &[u8]) -> u16 {
        use bytes::Buf;
        match self {
            ByteOrder::BigEndian => bytes.get_u16(),
            ByteOrder::LittleEndian => bytes.get_u16_le(),
        }
    }

    pub(crate) fn read_u32(self, mut bytes: &[u8]) -> u32 {
        use bytes::Buf;
        match self {
            ByteOrder::BigEndian => bytes.get_u32(),
            ByteOrder::LittleEndian => bytes.get_u32_le(),
        }
    }

    pub(crate) fn read_f32(self, mut bytes: &[u8]) -> f32 {
        use bytes::Buf;
        match self {
            ByteOrder::BigEndian => bytes.get_f32(),
            ByteOrder::LittleEndian => bytes.get_f32_le(),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Classic TIFF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Offset to the first IFD in the file
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    pub fn new(byte_order: ByteOrder) -> Self {
        TiffHeader {
            byte_order,
            first_ifd_offset: DEFAULT_FIRST_IFD_OFFSET,
        }
    }

    /// Encode the header followed by zero padding up to the first IFD.
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self.byte_order.magic());
        self.byte_order.put_u16(buf, TIFF_MAGIC);
        self.byte_order.put_u32(buf, self.first_ifd_offset);
        let padding = u64::from(self.first_ifd_offset).saturating_sub(TIFF_HEADER_SIZE);
        buf.put_bytes(0, padding as usize);
    }

    /// Write the header at the start of the stream.
    ///
    /// # Errors
    /// - `InvalidArgument` if the stream byte order differs from the header's,
    ///   or if the first IFD offset would overlap the header
    /// - `Io` if the stream fails
    pub fn write<W: OutputTarget>(&self, stream: &mut TiffOutputStream<W>) -> Result<(), TiffError> {
        if stream.byte_order() != self.byte_order {
            return Err(TiffError::InvalidArgument(format!(
                "stream is {} but header declares {}",
                stream.byte_order().name(),
                self.byte_order.name()
            )));
        }
        if u64::from(self.first_ifd_offset) < TIFF_HEADER_SIZE {
            return Err(TiffError::InvalidArgument(format!(
                "first IFD offset {} overlaps the {}-byte header",
                self.first_ifd_offset, TIFF_HEADER_SIZE
            )));
        }

        let mut buf = Vec::with_capacity(self.first_ifd_offset as usize);
        self.encode(&mut buf);
        stream.seek(0)?;
        stream.write_bytes(&buf)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
