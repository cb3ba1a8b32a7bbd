//! Classic TIFF writer primitives.
//!
//! This module holds everything needed to serialize a single-IFD, planar,
//! uncompressed float32 TIFF.
//!
//! # Key Concepts
//!
//! - **Byte order**: chosen once in the header (II = little-endian,
//!   MM = big-endian). Every multi-byte value in the file follows it.
//!
//! - **Directory entries**: each tag occupies exactly 12 bytes in the IFD,
//!   no matter how large its payload is.
//!
//! - **Inline vs referenced values**: payloads of at most 4 bytes live in the
//!   entry itself; larger ones go to a block right after the directory and
//!   the entry stores their absolute offset.
//!
//! - **Strips**: one strip per band, full image height, in band order.

mod entry;
mod header;
mod ifd;
mod tags;
mod values;

pub use entry::{DirectoryEntry, IFD_ENTRY_SIZE};
pub use header::{ByteOrder, TiffHeader, DEFAULT_FIRST_IFD_OFFSET, TIFF_HEADER_SIZE, TIFF_MAGIC};
pub use ifd::{EntryLayout, IfdLayout, TiffIfd, IFD_ENTRY_COUNT};
pub use tags::{
    Compression, FieldType, Photometric, PlanarConfiguration, ResolutionUnit, SampleFormat,
    TiffTag,
};
pub use values::{Rational, TiffAscii, TiffValue};
