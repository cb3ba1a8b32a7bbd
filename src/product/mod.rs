//! In-memory raster product model.
//!
//! A [`Product`] is a fixed-size scene holding an ordered list of bands. Each
//! [`Band`] declares a native sample type and may carry a dense pixel buffer.
//! The TIFF writer only reads band count and scene dimensions to lay out the
//! file; pixel buffers are consumed when strips are written.

use std::fmt;
use std::str::FromStr;

use crate::error::TiffError;
use crate::format::tiff::SampleFormat;

// =============================================================================
// SampleType
// =============================================================================

/// Native numeric type of a band's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl SampleType {
    pub const ALL: [SampleType; 8] = [
        SampleType::Int8,
        SampleType::UInt8,
        SampleType::Int16,
        SampleType::UInt16,
        SampleType::Int32,
        SampleType::UInt32,
        SampleType::Float32,
        SampleType::Float64,
    ];

    pub const fn size_in_bytes(self) -> usize {
        match self {
            SampleType::Int8 | SampleType::UInt8 => 1,
            SampleType::Int16 | SampleType::UInt16 => 2,
            SampleType::Int32 | SampleType::UInt32 | SampleType::Float32 => 4,
            SampleType::Float64 => 8,
        }
    }

    pub const fn bits_per_sample(self) -> u16 {
        (self.size_in_bytes() * 8) as u16
    }

    pub const fn is_float(self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// TIFF SampleFormat code describing this type.
    pub const fn sample_format(self) -> SampleFormat {
        match self {
            SampleType::UInt8 | SampleType::UInt16 | SampleType::UInt32 => SampleFormat::Unsigned,
            SampleType::Int8 | SampleType::Int16 | SampleType::Int32 => SampleFormat::Signed,
            SampleType::Float32 | SampleType::Float64 => SampleFormat::Float,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SampleType::Int8 => "int8",
            SampleType::UInt8 => "uint8",
            SampleType::Int16 => "int16",
            SampleType::UInt16 => "uint16",
            SampleType::Int32 => "int32",
            SampleType::UInt32 => "uint32",
            SampleType::Float32 => "float32",
            SampleType::Float64 => "float64",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SampleType::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| {
                format!(
                    "unknown sample type '{}' (expected one of: {})",
                    s,
                    SampleType::ALL.map(SampleType::name).join(", ")
                )
            })
    }
}

/// Sample type every band is written as, whatever its native type.
pub fn normalized_sample_type(_native: SampleType) -> SampleType {
    SampleType::Float32
}

// =============================================================================
// RasterData
// =============================================================================

/// Dense, row-major pixel buffer of a single band.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl RasterData {
    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            RasterData::Int8(v) => v.len(),
            RasterData::UInt8(v) => v.len(),
            RasterData::Int16(v) => v.len(),
            RasterData::UInt16(v) => v.len(),
            RasterData::Int32(v) => v.len(),
            RasterData::UInt32(v) => v.len(),
            RasterData::Float32(v) => v.len(),
            RasterData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            RasterData::Int8(_) => SampleType::Int8,
            RasterData::UInt8(_) => SampleType::UInt8,
            RasterData::Int16(_) => SampleType::Int16,
            RasterData::UInt16(_) => SampleType::UInt16,
            RasterData::Int32(_) => SampleType::Int32,
            RasterData::UInt32(_) => SampleType::UInt32,
            RasterData::Float32(_) => SampleType::Float32,
            RasterData::Float64(_) => SampleType::Float64,
        }
    }

    /// Sample `index` converted to the output type.
    ///
    /// 32-bit integers and doubles lose precision here; the conversion is
    /// the same `as` cast the whole writer applies.
    pub fn value_f32(&self, index: usize) -> Option<f32> {
        match self {
            RasterData::Int8(v) => v.get(index).map(|&x| f32::from(x)),
            RasterData::UInt8(v) => v.get(index).map(|&x| f32::from(x)),
            RasterData::Int16(v) => v.get(index).map(|&x| f32::from(x)),
            RasterData::UInt16(v) => v.get(index).map(|&x| f32::from(x)),
            RasterData::Int32(v) => v.get(index).map(|&x| x as f32),
            RasterData::UInt32(v) => v.get(index).map(|&x| x as f32),
            RasterData::Float32(v) => v.get(index).copied(),
            RasterData::Float64(v) => v.get(index).map(|&x| x as f32),
        }
    }

    /// Synthetic buffer of `len` samples counting up from `start`, wrapping
    /// in the range of narrow integer types.
    pub fn fill_ramp(sample_type: SampleType, len: usize, start: u32) -> Self {
        let ramp = (0..len as u64).map(move |i| u64::from(start) + i);
        match sample_type {
            SampleType::Int8 => RasterData::Int8(ramp.map(|v| v as i8).collect()),
            SampleType::UInt8 => RasterData::UInt8(ramp.map(|v| v as u8).collect()),
            SampleType::Int16 => RasterData::Int16(ramp.map(|v| v as i16).collect()),
            SampleType::UInt16 => RasterData::UInt16(ramp.map(|v| v as u16).collect()),
            SampleType::Int32 => RasterData::Int32(ramp.map(|v| v as i32).collect()),
            SampleType::UInt32 => RasterData::UInt32(ramp.map(|v| v as u32).collect()),
            SampleType::Float32 => RasterData::Float32(ramp.map(|v| v as f32 + 0.5).collect()),
            SampleType::Float64 => RasterData::Float64(ramp.map(|v| v as f64 + 0.25).collect()),
        }
    }
}

// =============================================================================
// Band
// =============================================================================

/// One named layer of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    name: String,
    sample_type: SampleType,
    data: Option<RasterData>,
}

impl Band {
    /// A band without pixel data.
    pub fn new(name: impl Into<String>, sample_type: SampleType) -> Self {
        Band {
            name: name.into(),
            sample_type,
            data: None,
        }
    }

    /// A band backed by a pixel buffer; the sample type follows the buffer.
    pub fn with_data(name: impl Into<String>, data: RasterData) -> Self {
        Band {
            name: name.into(),
            sample_type: data.sample_type(),
            data: Some(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn data(&self) -> Option<&RasterData> {
        self.data.as_ref()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A raster scene with an ordered set of equally sized bands.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    name: String,
    product_type: String,
    width: u32,
    height: u32,
    bands: Vec<Band>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        product_type: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Product {
            name: name.into(),
            product_type: product_type.into(),
            width,
            height,
            bands: Vec::new(),
        }
    }

    /// Append a band. Band order is the on-disk strip order.
    ///
    /// # Errors
    /// `InvalidArgument` if the name is empty or already used, or if the
    /// band's buffer does not cover the scene exactly.
    pub fn add_band(&mut self, band: Band) -> Result<&Band, TiffError> {
        if band.name.is_empty() {
            return Err(TiffError::InvalidArgument(
                "band name must not be empty".to_string(),
            ));
        }
        if self.band_index(&band.name).is_some() {
            return Err(TiffError::InvalidArgument(format!(
                "product '{}' already has a band named '{}'",
                self.name, band.name
            )));
        }
        if let Some(data) = &band.data {
            let expected = self.pixel_count();
            if data.len() as u64 != expected {
                return Err(TiffError::InvalidArgument(format!(
                    "band '{}' holds {} samples, scene needs {}",
                    band.name,
                    data.len(),
                    expected
                )));
            }
        }

        self.bands.push(band);
        let index = self.bands.len() - 1;
        Ok(&self.bands[index])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, name: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.name == name)
    }

    /// Position of the named band, which is also its strip index.
    pub fn band_index(&self, name: &str) -> Option<usize> {
        self.bands.iter().position(|b| b.name == name)
    }
}

// =============================================================================
// Tests
// =============================================================================
