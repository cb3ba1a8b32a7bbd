//! TIFF value primitives.
//!
//! A directory entry's payload is a list of typed values. Each value knows its
//! wire type, its size in bytes and how to serialize itself in the file's
//! byte order. The set of types is closed: SHORT, LONG, RATIONAL and ASCII.

use bytes::BufMut;

use crate::error::TiffError;

use super::header::ByteOrder;
use super::tags::FieldType;

// =============================================================================
// Rational
// =============================================================================

/// A TIFF RATIONAL: two unsigned 32-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Rational {
            numerator,
            denominator,
        }
    }

    /// The quotient as a double.
    pub fn value(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

// =============================================================================
// TiffAscii
// =============================================================================

/// A non-empty ASCII string, written with a single NUL terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffAscii(String);

impl TiffAscii {
    /// # Errors
    /// `InvalidArgument` if the string is empty, holds non-ASCII characters
    /// or contains a NUL, which would end the value early for readers.
    pub fn new(value: impl Into<String>) -> Result<Self, TiffError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TiffError::InvalidArgument(
                "ASCII value must not be empty".to_string(),
            ));
        }
        if !value.is_ascii() {
            return Err(TiffError::InvalidArgument(format!(
                "ASCII value {:?} contains non-ASCII characters",
                value
            )));
        }
        if value.contains('\0') {
            return Err(TiffError::InvalidArgument(format!(
                "ASCII value {:?} contains an embedded NUL",
                value
            )));
        }
        Ok(TiffAscii(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// String bytes plus the terminator.
    pub fn size_in_bytes(&self) -> usize {
        self.0.len() + 1
    }
}

// =============================================================================
// TiffValue
// =============================================================================

/// One element of a directory entry's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TiffValue {
    UShort(u16),
    ULong(u32),
    Rational(Rational),
    Ascii(TiffAscii),
}

impl TiffValue {
    /// Wire type of this value.
    pub const fn field_type(&self) -> FieldType {
        match self {
            TiffValue::UShort(_) => FieldType::Short,
            TiffValue::ULong(_) => FieldType::Long,
            TiffValue::Rational(_) => FieldType::Rational,
            TiffValue::Ascii(_) => FieldType::Ascii,
        }
    }

    /// Number of wire elements this value contributes to an entry's count.
    ///
    /// An ASCII string counts every character plus the terminator.
    pub fn element_count(&self) -> usize {
        match self {
            TiffValue::Ascii(s) => s.size_in_bytes(),
            _ => 1,
        }
    }

    /// Encoded size in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.element_count() * self.field_type().size_in_bytes()
    }

    /// Integer content of SHORT and LONG values.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TiffValue::UShort(v) => Some(u32::from(*v)),
            TiffValue::ULong(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            TiffValue::Rational(r) => Some(*r),
            _ => None,
        }
    }

    /// Serialize this value in the given byte order.
    pub fn encode(&self, buf: &mut impl BufMut, order: ByteOrder) {
        match self {
            TiffValue::UShort(v) => order.put_u16(buf, *v),
            TiffValue::ULong(v) => order.put_u32(buf, *v),
            TiffValue::Rational(r) => {
                order.put_u32(buf, r.numerator);
                order.put_u32(buf, r.denominator);
            }
            TiffValue::Ascii(s) => {
                buf.put_slice(s.as_str().as_bytes());
                buf.put_u8(0);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
