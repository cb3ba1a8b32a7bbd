//! IFD directory entries.
//!
//! Every entry occupies exactly 12 bytes on disk:
//!
//! ```text
//! Bytes 0-1:  Tag
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Value count
//! Bytes 8-11: Value (if it fits in 4 bytes) or offset of the value block
//! ```

use bytes::BufMut;

use crate::error::TiffError;
use crate::io::{OutputTarget, TiffOutputStream};

use super::header::ByteOrder;
use super::tags::{FieldType, TiffTag};
use super::values::{Rational, TiffAscii, TiffValue};

/// Size of a classic TIFF directory entry in bytes.
pub const IFD_ENTRY_SIZE: u64 = 12;

/// One (tag, type, count, value) record of an IFD.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    tag: TiffTag,
    field_type: FieldType,
    values: Vec<TiffValue>,
    values_offset: Option<u32>,
}

impl DirectoryEntry {
    /// Create an entry from a list of values of one wire type.
    ///
    /// # Errors
    /// `InvalidArgument` if `values` is empty or mixes field types.
    pub fn new(tag: TiffTag, values: Vec<TiffValue>) -> Result<Self, TiffError> {
        let field_type = values
            .first()
            .map(TiffValue::field_type)
            .ok_or_else(|| {
                TiffError::InvalidArgument(format!("entry {} has no values", tag.name()))
            })?;

        if values.iter().any(|v| v.field_type() != field_type) {
            return Err(TiffError::InvalidArgument(format!(
                "entry {} mixes field types",
                tag.name()
            )));
        }

        Ok(Self::from_parts(tag, field_type, values))
    }

    fn from_parts(tag: TiffTag, field_type: FieldType, values: Vec<TiffValue>) -> Self {
        DirectoryEntry {
            tag,
            field_type,
            values,
            values_offset: None,
        }
    }

    pub fn short(tag: TiffTag, value: u16) -> Self {
        Self::from_parts(tag, FieldType::Short, vec![TiffValue::UShort(value)])
    }

    /// An array-valued SHORT entry. Stays an array even with one element.
    ///
    /// # Panics
    /// Panics if `values` is empty. Outside the crate use [`DirectoryEntry::new`].
    pub(crate) fn shorts(tag: TiffTag, values: &[u16]) -> Self {
        assert!(!values.is_empty(), "{} needs at least one value", tag.name());
        let values = values.iter().copied().map(TiffValue::UShort).collect();
        Self::from_parts(tag, FieldType::Short, values)
    }

    pub fn long(tag: TiffTag, value: u32) -> Self {
        Self::from_parts(tag, FieldType::Long, vec![TiffValue::ULong(value)])
    }

    /// An array-valued LONG entry. Stays an array even with one element.
    ///
    /// # Panics
    /// Panics if `values` is empty. Outside the crate use [`DirectoryEntry::new`].
    pub(crate) fn longs(tag: TiffTag, values: &[u32]) -> Self {
        assert!(!values.is_empty(), "{} needs at least one value", tag.name());
        let values = values.iter().copied().map(TiffValue::ULong).collect();
        Self::from_parts(tag, FieldType::Long, values)
    }

    pub fn rational(tag: TiffTag, value: Rational) -> Self {
        Self::from_parts(tag, FieldType::Rational, vec![TiffValue::Rational(value)])
    }

    pub fn ascii(tag: TiffTag, value: TiffAscii) -> Self {
        Self::from_parts(tag, FieldType::Ascii, vec![TiffValue::Ascii(value)])
    }

    #[inline]
    pub fn tag(&self) -> TiffTag {
        self.tag
    }

    #[inline]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The values backing this entry, always as a list.
    pub fn values(&self) -> &[TiffValue] {
        &self.values
    }

    /// Integer values of a SHORT or LONG entry.
    pub fn u32_values(&self) -> Vec<u32> {
        self.values.iter().filter_map(TiffValue::as_u32).collect()
    }

    /// Wire element count written in the entry's count field.
    pub fn count(&self) -> usize {
        self.values.iter().map(TiffValue::element_count).sum()
    }

    /// Total payload size in bytes.
    pub fn values_size_in_bytes(&self) -> usize {
        self.values.iter().map(TiffValue::size_in_bytes).sum()
    }

    /// Whether the payload is too large for the 4-byte value field.
    pub fn must_values_be_referenced(&self) -> bool {
        !self.field_type.fits_inline(self.count())
    }

    /// Absolute offset of the out-of-line payload, or `None` when inline or
    /// not yet assigned.
    pub fn values_offset(&self) -> Option<u32> {
        self.values_offset
    }

    pub(crate) fn set_values_offset(&mut self, offset: Option<u32>) {
        self.values_offset = offset;
    }

    /// Replace LONG values in place, keeping the element count.
    pub(crate) fn patch_longs(&mut self, values: &[u32]) {
        debug_assert_eq!(self.field_type, FieldType::Long);
        debug_assert_eq!(self.values.len(), values.len());
        self.values = values.iter().copied().map(TiffValue::ULong).collect();
    }

    /// Encode the 12-byte directory record.
    ///
    /// Inline payloads are left-justified and zero-padded; referenced
    /// payloads get their offset, or 0 if it has not been assigned yet.
    pub fn encode(&self, buf: &mut impl BufMut, order: ByteOrder) {
        order.put_u16(buf, self.tag.as_u16());
        order.put_u16(buf, self.field_type.as_u16());
        order.put_u32(buf, self.count() as u32);

        if self.must_values_be_referenced() {
            order.put_u32(buf, self.values_offset.unwrap_or(0));
        } else {
            let mut field = Vec::with_capacity(FieldType::INLINE_THRESHOLD);
            self.encode_values(&mut field, order);
            field.resize(FieldType::INLINE_THRESHOLD, 0);
            buf.put_slice(&field);
        }
    }

    /// Encode the payload contiguously, as stored out of line.
    pub fn encode_values(&self, buf: &mut impl BufMut, order: ByteOrder) {
        for value in &self.values {
            value.encode(buf, order);
        }
    }

    /// Write the 12-byte record at the stream's current position.
    pub fn write<W: OutputTarget>(&self, stream: &mut TiffOutputStream<W>) -> Result<(), TiffError> {
        let mut buf = Vec::with_capacity(IFD_ENTRY_SIZE as usize);
        self.encode(&mut buf, stream.byte_order());
        stream.write_bytes(&buf)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
