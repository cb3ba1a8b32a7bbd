//! # planar-tiff
//!
//! A writer for single-directory, planar, uncompressed TIFF files.
//!
//! Every band of a raster product is stored as its own strip of 32-bit IEEE
//! floats, whatever the band's native sample type. The file layout is
//! computed in full before anything is written, so the output can be sized
//! exactly and an existing larger file is cropped rather than left with
//! stale trailing bytes.
//!
//! ## Architecture
//!
//! - [`io`] - Output stream with a fixed byte order over a seekable target
//! - [`mod@format`] - TIFF header, value primitives, directory entries and the IFD
//! - [`product`] - In-memory raster product model
//! - [`writer`] - Product writer placing band pixels into their strips
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use planar_tiff::{write_product_to_path, Band, ByteOrder, Product, RasterData};
//!
//! let mut product = Product::new("scene", "DEMO", 10, 20);
//! product
//!     .add_band(Band::with_data("elevation", RasterData::Int16(vec![0; 200])))
//!     .unwrap();
//!
//! let size = write_product_to_path("scene.tif", &product, ByteOrder::BigEndian).unwrap();
//! println!("wrote {} bytes", size);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod product;
pub mod writer;

// Re-export commonly used types
pub use config::{Cli, Command, LayoutConfig, WriteConfig};
pub use error::{TiffError, WriteError};
pub use format::tiff::{
    ByteOrder, DirectoryEntry, EntryLayout, FieldType, IfdLayout, Rational, TiffAscii, TiffHeader,
    TiffIfd, TiffTag, TiffValue, DEFAULT_FIRST_IFD_OFFSET, IFD_ENTRY_COUNT, TIFF_HEADER_SIZE,
};
pub use io::{OutputTarget, TiffOutputStream};
pub use product::{normalized_sample_type, Band, Product, RasterData, SampleType};
pub use writer::{write_product, write_product_to_path, GeoTiffProductWriter};
