use thiserror::Error;

/// Errors raised while building or serializing TIFF structures.
#[derive(Debug, Error)]
pub enum TiffError {
    /// A caller-supplied value violates a construction or write precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A computed offset does not fit the 32-bit offset field of classic TIFF
    #[error("File too large for classic TIFF: offset {offset} exceeds 4 GiB")]
    FileTooLarge { offset: u64 },

    /// Failure reported by the underlying output stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when writing a raster product to a TIFF file
#[derive(Debug, Error)]
pub enum WriteError {
    /// Error from the IFD / header layer
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// I/O error while writing band data or opening the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The band passed to the writer is not part of the product being written
    #[error("The band '{0}' is not a band of the product being written")]
    BandNotInProduct(String),

    /// Requested region exceeds the scene raster
    #[error(
        "Region out of bounds: {width}x{height} at ({x}, {y}) exceeds scene of {scene_width}x{scene_height}"
    )]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        scene_width: u32,
        scene_height: u32,
    },

    /// Pixel buffer does not match the region it is written to
    #[error("Data length mismatch: expected {expected} samples, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Band has no pixel buffer attached
    #[error("Band '{0}' has no raster data")]
    MissingBandData(String),
}
