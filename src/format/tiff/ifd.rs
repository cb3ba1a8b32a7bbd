//! Image File Directory layout and serialization.
//!
//! An IFD is built once per output product. It holds the 14 directory
//! entries this writer emits, answers every size question before a single
//! byte is written, and serializes itself in one pass.
//!
//! # On-disk layout
//!
//! ```text
//! ifd_start                  entry count (2 bytes)
//! ifd_start + 2              14 entries x 12 bytes, ascending tag order
//! ifd_start + 170            next IFD offset (4 bytes)
//! ifd_start + 174            referenced values, same order, no padding
//! pixel_data_start           one strip per band, band order
//! ```
//!
//! # Two-phase write
//!
//! StripOffsets depend on the size of the referenced-values block, which in
//! turn depends on every entry. The write therefore computes the full
//! [`IfdLayout`] first, patches value offsets and strip offsets from it, and
//! only then emits the bytes.

use std::collections::BTreeMap;

use bytes::BytesMut;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::TiffError;
use crate::io::{OutputTarget, TiffOutputStream};
use crate::product::{normalized_sample_type, Product};

use super::entry::{DirectoryEntry, IFD_ENTRY_SIZE};
use super::header::ByteOrder;
use super::tags::{Compression, Photometric, PlanarConfiguration, ResolutionUnit, TiffTag};
use super::values::Rational;

// =============================================================================
// Constants
// =============================================================================

/// Number of directory entries emitted for every product.
pub const IFD_ENTRY_COUNT: usize = 14;

/// Size of the entry-count prefix.
const ENTRY_COUNT_SIZE: u64 = 2;

/// Size of the trailing next-IFD offset.
const NEXT_IFD_OFFSET_SIZE: u64 = 4;

/// Resolution written to XResolution and YResolution.
const UNIT_RESOLUTION: Rational = Rational::new(1, 1);

// =============================================================================
// Layout report
// =============================================================================

/// Placement of a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLayout {
    pub tag: u16,
    pub name: &'static str,
    pub field_type: &'static str,
    pub count: usize,
    pub size_in_bytes: usize,
    pub inline: bool,

    /// Absolute offset of the referenced payload, `None` when inline
    pub values_offset: Option<u64>,
}

/// Absolute placement of an IFD and everything it references.
///
/// Computed without touching any stream, so callers can size or inspect a
/// file before writing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IfdLayout {
    /// Offset of the entry-count prefix
    pub ifd_offset: u64,

    /// Directory size: count prefix, entries and next-IFD offset
    pub ifd_size: u64,

    /// Offset of the referenced-values block
    pub values_offset: u64,

    pub values_size: u64,

    /// Offset of the first strip
    pub pixel_data_offset: u64,

    pub strips_size: u64,

    /// One past the last strip byte
    pub end_offset: u64,

    pub entries: Vec<EntryLayout>,

    /// Absolute offset of each band's strip
    pub strip_offsets: Vec<u64>,

    pub strip_byte_counts: Vec<u32>,
}

// =============================================================================
// TiffIfd
// =============================================================================

/// The single IFD describing a planar float32 product.
#[derive(Debug, Clone)]
pub struct TiffIfd {
    /// Entries keyed by numeric tag, so iteration is ascending tag order
    entries: BTreeMap<u16, DirectoryEntry>,

    band_count: usize,
}

impl TiffIfd {
    /// Build the directory for a product.
    ///
    /// Every band is described as a 32-bit float strip regardless of its
    /// native sample type. StripOffsets are placeholders until [`write`].
    ///
    /// # Errors
    /// `InvalidArgument` if the product has no bands, has a zero dimension,
    /// or a band strip would not fit a 32-bit byte count.
    ///
    /// [`write`]: TiffIfd::write
    pub fn new(product: &Product) -> Result<Self, TiffError> {
        let band_count = product.num_bands();
        if band_count == 0 {
            return Err(TiffError::InvalidArgument(format!(
                "product '{}' has no bands",
                product.name()
            )));
        }
        let samples_per_pixel = u16::try_from(band_count).map_err(|_| {
            TiffError::InvalidArgument(format!(
                "product '{}' has {} bands, SamplesPerPixel holds at most {}",
                product.name(),
                band_count,
                u16::MAX
            ))
        })?;

        let width = product.width();
        let height = product.height();
        if width == 0 || height == 0 {
            return Err(TiffError::InvalidArgument(format!(
                "product '{}' has an empty scene of {}x{}",
                product.name(),
                width,
                height
            )));
        }

        let mut bits_per_sample = Vec::with_capacity(band_count);
        let mut sample_formats = Vec::with_capacity(band_count);
        let mut strip_byte_counts = Vec::with_capacity(band_count);

        for band in product.bands() {
            let output_type = normalized_sample_type(band.sample_type());
            let strip_size =
                u64::from(width) * u64::from(height) * output_type.size_in_bytes() as u64;
            let strip_size = u32::try_from(strip_size).map_err(|_| {
                TiffError::InvalidArgument(format!(
                    "band '{}' needs {} bytes, more than a single strip can hold",
                    band.name(),
                    strip_size
                ))
            })?;

            bits_per_sample.push(output_type.bits_per_sample());
            sample_formats.push(output_type.sample_format() as u16);
            strip_byte_counts.push(strip_size);
        }

        let entries = [
            DirectoryEntry::long(TiffTag::ImageWidth, width),
            DirectoryEntry::long(TiffTag::ImageLength, height),
            DirectoryEntry::shorts(TiffTag::BitsPerSample, &bits_per_sample),
            DirectoryEntry::short(TiffTag::Compression, Compression::None as u16),
            DirectoryEntry::short(
                TiffTag::PhotometricInterpretation,
                Photometric::BlackIsZero as u16,
            ),
            DirectoryEntry::longs(TiffTag::StripOffsets, &vec![0; band_count]),
            DirectoryEntry::short(TiffTag::SamplesPerPixel, samples_per_pixel),
            DirectoryEntry::long(TiffTag::RowsPerStrip, height),
            DirectoryEntry::longs(TiffTag::StripByteCounts, &strip_byte_counts),
            DirectoryEntry::rational(TiffTag::XResolution, UNIT_RESOLUTION),
            DirectoryEntry::rational(TiffTag::YResolution, UNIT_RESOLUTION),
            DirectoryEntry::short(
                TiffTag::PlanarConfiguration,
                PlanarConfiguration::Planar as u16,
            ),
            DirectoryEntry::short(TiffTag::ResolutionUnit, ResolutionUnit::None as u16),
            DirectoryEntry::shorts(TiffTag::SampleFormat, &sample_formats),
        ];

        let entries = entries
            .into_iter()
            .map(|entry| (entry.tag().as_u16(), entry))
            .collect();

        Ok(TiffIfd {
            entries,
            band_count,
        })
    }

    /// Look up an entry by tag.
    pub fn get_entry(&self, tag: TiffTag) -> Option<&DirectoryEntry> {
        self.entries.get(&tag.as_u16())
    }

    /// All entries in ascending tag order.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.values()
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    // -------------------------------------------------------------------------
    // Size queries
    // -------------------------------------------------------------------------

    /// Directory size: count prefix, 12 bytes per entry and next-IFD offset.
    pub fn required_ifd_size(&self) -> u64 {
        ENTRY_COUNT_SIZE + IFD_ENTRY_SIZE * self.entries.len() as u64 + NEXT_IFD_OFFSET_SIZE
    }

    /// Total size of all payloads too large for their entry's value field.
    pub fn required_referenced_values_size(&self) -> u64 {
        self.entries
            .values()
            .filter(|entry| entry.must_values_be_referenced())
            .map(|entry| entry.values_size_in_bytes() as u64)
            .sum()
    }

    /// Sum of all strip byte counts.
    pub fn required_size_for_strips(&self) -> u64 {
        self.strip_byte_counts().iter().map(|&c| u64::from(c)).sum()
    }

    pub fn required_entire_size(&self) -> u64 {
        self.required_ifd_size()
            + self.required_referenced_values_size()
            + self.required_size_for_strips()
    }

    /// Current StripOffsets values. All zero until the IFD has been written.
    pub fn strip_offsets(&self) -> Vec<u32> {
        self.longs_of(TiffTag::StripOffsets)
    }

    pub fn strip_byte_counts(&self) -> Vec<u32> {
        self.longs_of(TiffTag::StripByteCounts)
    }

    fn longs_of(&self, tag: TiffTag) -> Vec<u32> {
        self.get_entry(tag)
            .map(DirectoryEntry::u32_values)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Compute where every part of the directory lands if it starts at
    /// `ifd_start_offset`.
    pub fn layout(&self, ifd_start_offset: u64) -> IfdLayout {
        let ifd_size = self.required_ifd_size();
        let values_offset = ifd_start_offset + ifd_size;

        let mut running = 0u64;
        let entries = self
            .entries
            .values()
            .map(|entry| {
                let referenced = entry.must_values_be_referenced();
                let offset = referenced.then(|| {
                    let offset = values_offset + running;
                    running += entry.values_size_in_bytes() as u64;
                    offset
                });
                EntryLayout {
                    tag: entry.tag().as_u16(),
                    name: entry.tag().name(),
                    field_type: entry.field_type().name(),
                    count: entry.count(),
                    size_in_bytes: entry.values_size_in_bytes(),
                    inline: !referenced,
                    values_offset: offset,
                }
            })
            .collect();

        let values_size = running;
        let pixel_data_offset = values_offset + values_size;

        let strip_byte_counts = self.strip_byte_counts();
        let mut next_strip = pixel_data_offset;
        let strip_offsets = strip_byte_counts
            .iter()
            .map(|&count| {
                let offset = next_strip;
                next_strip += u64::from(count);
                offset
            })
            .collect();

        IfdLayout {
            ifd_offset: ifd_start_offset,
            ifd_size,
            values_offset,
            values_size,
            pixel_data_offset,
            strips_size: next_strip - pixel_data_offset,
            end_offset: next_strip,
            entries,
            strip_offsets,
            strip_byte_counts,
        }
    }

    // -------------------------------------------------------------------------
    // Write
    // -------------------------------------------------------------------------

    /// Check that every offset of a directory placed at `ifd_start_offset`
    /// fits the classic TIFF 32-bit range, without writing anything.
    ///
    /// # Errors
    /// - `FileTooLarge` naming the first offset out of range
    pub fn check_offsets(&self, ifd_start_offset: u64) -> Result<(), TiffError> {
        resolve_offsets(&self.layout(ifd_start_offset)).map(|_| ())
    }

    /// Serialize the directory and its referenced values at
    /// `ifd_start_offset`, finalizing value offsets and StripOffsets.
    ///
    /// Strip pixel data is not written here; callers place each band at the
    /// offset reported by [`strip_offsets`] afterwards.
    ///
    /// # Errors
    /// - `InvalidArgument` if `ifd_start_offset` is negative (nothing is written)
    /// - `FileTooLarge` if any offset exceeds the 32-bit range (nothing is written)
    /// - `Io` if the stream fails
    ///
    /// [`strip_offsets`]: TiffIfd::strip_offsets
    pub fn write<W: OutputTarget>(
        &mut self,
        stream: &mut TiffOutputStream<W>,
        ifd_start_offset: i64,
        next_ifd_offset: u32,
    ) -> Result<(), TiffError> {
        let start = u64::try_from(ifd_start_offset).map_err(|_| {
            TiffError::InvalidArgument(format!(
                "IFD start offset must not be negative, got {}",
                ifd_start_offset
            ))
        })?;

        let layout = self.layout(start);
        debug!(
            ifd_offset = layout.ifd_offset,
            values_offset = layout.values_offset,
            values_size = layout.values_size,
            pixel_data_offset = layout.pixel_data_offset,
            end_offset = layout.end_offset,
            "Computed IFD layout for {} band(s)",
            self.band_count
        );

        // Resolve everything before mutating so a failure leaves the IFD untouched
        let (strip_offsets, value_offsets) = resolve_offsets(&layout)?;

        if let Some(entry) = self.entries.get_mut(&TiffTag::StripOffsets.as_u16()) {
            entry.patch_longs(&strip_offsets);
        }
        for (entry, offset) in self.entries.values_mut().zip(value_offsets) {
            entry.set_values_offset(offset);
        }

        let buf = self.encode(stream.byte_order(), next_ifd_offset, &layout);
        stream.seek(start)?;
        stream.write_bytes(&buf)?;

        debug!(
            "Wrote IFD at offset {} ({} bytes), strips at {:?}",
            start,
            buf.len(),
            strip_offsets
        );
        Ok(())
    }

    /// Directory followed by the referenced-values block.
    fn encode(&self, order: ByteOrder, next_ifd_offset: u32, layout: &IfdLayout) -> BytesMut {
        let mut buf = BytesMut::with_capacity((layout.ifd_size + layout.values_size) as usize);

        order.put_u16(&mut buf, self.entries.len() as u16);
        for entry in self.entries.values() {
            trace!(
                tag = entry.tag().as_u16(),
                count = entry.count(),
                values_offset = ?entry.values_offset(),
                "Encoding {} entry",
                entry.tag().name()
            );
            entry.encode(&mut buf, order);
        }
        order.put_u32(&mut buf, next_ifd_offset);

        for entry in self.entries.values() {
            if entry.must_values_be_referenced() {
                entry.encode_values(&mut buf, order);
            }
        }

        debug_assert_eq!(buf.len() as u64, layout.ifd_size + layout.values_size);
        buf
    }
}

/// Strip offsets and per-entry value offsets of a layout as 32-bit offsets.
fn resolve_offsets(layout: &IfdLayout) -> Result<(Vec<u32>, Vec<Option<u32>>), TiffError> {
    let strip_offsets = layout
        .strip_offsets
        .iter()
        .map(|&offset| to_offset(offset))
        .collect::<Result<Vec<u32>, _>>()?;
    let value_offsets = layout
        .entries
        .iter()
        .map(|entry| entry.values_offset.map(to_offset).transpose())
        .collect::<Result<Vec<Option<u32>>, _>>()?;
    Ok((strip_offsets, value_offsets))
}

/// Narrow an absolute offset to a classic TIFF 32-bit offset.
fn to_offset(offset: u64) -> Result<u32, TiffError> {
    u32::try_from(offset).map_err(|_| TiffError::FileTooLarge { offset })
}

// =============================================================================
// Tests
// =============================================================================
