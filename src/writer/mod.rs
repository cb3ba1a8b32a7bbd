//! Product writer: turns a [`Product`] into a planar float32 TIFF file.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    GeoTiffProductWriter                       │
//! │                                                               │
//! │  create()                     write_band_raster_data()        │
//! │  1. Build IFD from product    1. Resolve band -> strip        │
//! │  2. Write header (offset 10)  2. Check region and buffer      │
//! │  3. Write IFD + values        3. Write rows as f32            │
//! │  4. Crop/extend to size                                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The output is sized exactly before any pixel is written, so overwriting a
//! larger pre-existing file never leaves stale trailing bytes behind.

use std::fs::OpenOptions;
use std::path::Path;

use bytes::BytesMut;
use tracing::{debug, info, warn};

use crate::error::WriteError;
use crate::format::tiff::{ByteOrder, TiffHeader, TiffIfd};
use crate::io::{OutputTarget, TiffOutputStream};
use crate::product::{normalized_sample_type, Band, Product, RasterData};

// =============================================================================
// GeoTiffProductWriter
// =============================================================================

/// Writes one product into one output target.
///
/// The header and IFD are written by [`create`]; band pixels follow through
/// [`write_band_raster_data`] or [`write_band`], in any order and in any
/// number of regions.
///
/// [`create`]: GeoTiffProductWriter::create
/// [`write_band_raster_data`]: GeoTiffProductWriter::write_band_raster_data
/// [`write_band`]: GeoTiffProductWriter::write_band
pub struct GeoTiffProductWriter<'p, W: OutputTarget> {
    stream: TiffOutputStream<W>,
    product: &'p Product,
    ifd: TiffIfd,
    required_file_size: u64,
}

impl<'p, W: OutputTarget> GeoTiffProductWriter<'p, W> {
    /// Write the header and directory for `product` and size the target to
    /// hold the whole file.
    ///
    /// # Errors
    /// - `Tiff(InvalidArgument)` if the product cannot be described
    /// - `Tiff(FileTooLarge)` if the file exceeds the classic TIFF range
    /// - `Io` if the target fails
    pub fn create(
        target: W,
        product: &'p Product,
        byte_order: ByteOrder,
    ) -> Result<Self, WriteError> {
        let mut ifd = TiffIfd::new(product)?;
        let header = TiffHeader::new(byte_order);
        let mut stream = TiffOutputStream::new(target, byte_order);

        let ifd_offset = header.first_ifd_offset;
        let required_file_size = u64::from(ifd_offset) + ifd.required_entire_size();

        // Reject out-of-range layouts before the header touches the target
        ifd.check_offsets(u64::from(ifd_offset))?;
        header.write(&mut stream)?;
        ifd.write(&mut stream, i64::from(ifd_offset), 0)?;

        let existing = stream.length()?;
        if existing > required_file_size {
            warn!(
                existing_size = existing,
                required_size = required_file_size,
                "Cropping existing output for product '{}'",
                product.name()
            );
        }
        stream.truncate(required_file_size)?;

        debug!(
            bands = product.num_bands(),
            width = product.width(),
            height = product.height(),
            byte_order = byte_order.name(),
            "Prepared {} byte file for product '{}'",
            required_file_size,
            product.name()
        );

        Ok(GeoTiffProductWriter {
            stream,
            product,
            ifd,
            required_file_size,
        })
    }

    /// Exact length of the finished file, header included.
    pub fn required_file_size(&self) -> u64 {
        self.required_file_size
    }

    /// The directory written for this product, with final strip offsets.
    pub fn ifd(&self) -> &TiffIfd {
        &self.ifd
    }

    pub fn product(&self) -> &'p Product {
        self.product
    }

    /// Absolute offset of the named band's strip.
    pub fn strip_offset(&self, band_name: &str) -> Option<u64> {
        let index = self.product.band_index(band_name)?;
        self.ifd.strip_offsets().get(index).map(|&o| u64::from(o))
    }

    /// Write a rectangular region of one band.
    ///
    /// `data` is row-major and must hold exactly `width * height` samples.
    /// Every sample is converted to f32 in the file's byte order.
    ///
    /// # Errors
    /// - `BandNotInProduct` if no band of the product has this name
    /// - `RegionOutOfBounds` if the region leaves the scene
    /// - `DataLengthMismatch` if `data` does not cover the region
    /// - `Io` if the target fails
    pub fn write_band_raster_data(
        &mut self,
        band_name: &str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &RasterData,
    ) -> Result<(), WriteError> {
        let strip_offset = self
            .strip_offset(band_name)
            .ok_or_else(|| WriteError::BandNotInProduct(band_name.to_string()))?;

        let scene_width = self.product.width();
        let scene_height = self.product.height();
        if u64::from(x) + u64::from(width) > u64::from(scene_width)
            || u64::from(y) + u64::from(height) > u64::from(scene_height)
        {
            return Err(WriteError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                scene_width,
                scene_height,
            });
        }

        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(WriteError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        let order = self.stream.byte_order();
        let sample_size = normalized_sample_type(data.sample_type()).size_in_bytes() as u64;
        let row_len = width as usize;
        let mut row = BytesMut::with_capacity(row_len * sample_size as usize);

        for r in 0..height {
            let pixel = u64::from(y + r) * u64::from(scene_width) + u64::from(x);
            let start = r as usize * row_len;

            row.clear();
            for value in (start..start + row_len).filter_map(|i| data.value_f32(i)) {
                order.put_f32(&mut row, value);
            }

            self.stream.seek(strip_offset + pixel * sample_size)?;
            self.stream.write_bytes(&row)?;
        }

        debug!(
            x,
            y,
            width,
            height,
            "Wrote region of band '{}' ({})",
            band_name,
            data.sample_type()
        );
        Ok(())
    }

    /// Write a band's full pixel buffer.
    ///
    /// # Errors
    /// `MissingBandData` if the band carries no buffer; otherwise as
    /// [`write_band_raster_data`](Self::write_band_raster_data).
    pub fn write_band(&mut self, band: &Band) -> Result<(), WriteError> {
        let data = band
            .data()
            .ok_or_else(|| WriteError::MissingBandData(band.name().to_string()))?;
        let (width, height) = (self.product.width(), self.product.height());
        self.write_band_raster_data(band.name(), 0, 0, width, height, data)
    }

    /// Flush and hand back the target.
    pub fn finish(mut self) -> Result<W, WriteError> {
        self.stream.flush()?;
        Ok(self.stream.into_inner())
    }
}

// =============================================================================
// Convenience functions
// =============================================================================

/// Write a whole product, every band from its own buffer.
///
/// # Errors
/// `MissingBandData` if a band has no buffer, plus every error of
/// [`GeoTiffProductWriter`].
pub fn write_product<W: OutputTarget>(
    target: W,
    product: &Product,
    byte_order: ByteOrder,
) -> Result<W, WriteError> {
    let mut writer = GeoTiffProductWriter::create(target, product, byte_order)?;
    for band in product.bands() {
        writer.write_band(band)?;
    }
    writer.finish()
}

/// Write a whole product to a file, returning the final file length.
///
/// An existing file is reused without truncation on open, so it ends up
/// cropped to exactly the new size.
pub fn write_product_to_path(
    path: impl AsRef<Path>,
    product: &Product,
    byte_order: ByteOrder,
) -> Result<u64, WriteError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    let file = write_product(file, product, byte_order)?;
    let size = file.metadata()?.len();

    info!(
        path = %path.display(),
        bands = product.num_bands(),
        bytes = size,
        "Wrote product '{}'",
        product.name()
    );
    Ok(size)
}

// =============================================================================
// Tests
// =============================================================================
