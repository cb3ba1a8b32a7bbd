//! Command-line configuration for planar-tiff.
//!
//! This module provides the CLI surface of the binary:
//! - Command-line arguments via clap
//! - Environment variables with `PTIFF_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Commands
//!
//! - `write`: build a synthetic product and write it as a planar float32 TIFF
//! - `layout`: print where the IFD, referenced values and strips would land
//!
//! # Environment Variables
//!
//! - `PTIFF_WIDTH` - Scene width in pixels (default: 256)
//! - `PTIFF_HEIGHT` - Scene height in pixels (default: 256)
//! - `PTIFF_BANDS` - Comma-separated band sample types (default: float32)
//! - `PTIFF_BYTE_ORDER` - `big` or `little` (default: big)
//! - `PTIFF_IFD_OFFSET` - IFD offset for `layout` (default: 10)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::tiff::{ByteOrder, DEFAULT_FIRST_IFD_OFFSET};
use crate::product::SampleType;

// =============================================================================
// Default Values
// =============================================================================

/// Default scene width.
pub const DEFAULT_WIDTH: u32 = 256;

/// Default scene height.
pub const DEFAULT_HEIGHT: u32 = 256;

/// Largest band count accepted on the command line.
pub const MAX_BANDS: usize = 4096;

// =============================================================================
// CLI Arguments
// =============================================================================

/// planar-tiff - Write raster products as planar float32 TIFF files.
#[derive(Parser, Debug, Clone)]
#[command(name = "planar-tiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a synthetic ramp product to a TIFF file.
    Write(WriteConfig),

    /// Show the file layout for a product without writing anything.
    Layout(LayoutConfig),
}

/// Byte order selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrderArg {
    /// Motorola order ("MM")
    #[default]
    Big,
    /// Intel order ("II")
    Little,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Big => ByteOrder::BigEndian,
            ByteOrderArg::Little => ByteOrder::LittleEndian,
        }
    }
}

/// Scene shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Scene width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH, env = "PTIFF_WIDTH")]
    pub width: u32,

    /// Scene height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, env = "PTIFF_HEIGHT")]
    pub height: u32,

    /// Band sample types, comma-separated (e.g. uint8,int16,float32).
    ///
    /// Every band is written as float32 whatever its declared type.
    #[arg(
        long,
        env = "PTIFF_BANDS",
        value_delimiter = ',',
        default_value = "float32"
    )]
    pub bands: Vec<SampleType>,
}

impl SceneArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "scene must not be empty, got {}x{}",
                self.width, self.height
            ));
        }
        if self.bands.is_empty() {
            return Err("at least one band is required. Set --bands or PTIFF_BANDS".to_string());
        }
        if self.bands.len() > MAX_BANDS {
            return Err(format!("at most {} bands are supported", MAX_BANDS));
        }

        // Each band is one strip with a 32-bit byte count
        let strip_size = u64::from(self.width) * u64::from(self.height) * 4;
        if strip_size > u64::from(u32::MAX) {
            return Err(format!(
                "a {}x{} float32 band needs {} bytes, more than one strip can hold",
                self.width, self.height, strip_size
            ));
        }

        Ok(())
    }
}

/// Configuration for the `write` command.
#[derive(Args, Debug, Clone)]
pub struct WriteConfig {
    /// Output file. An existing file is overwritten and cropped.
    #[arg(short, long, env = "PTIFF_OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub scene: SceneArgs,

    /// Byte order of the written file.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Big, env = "PTIFF_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,

    /// Product name recorded in log output.
    #[arg(long, default_value = "synthetic", env = "PTIFF_PRODUCT_NAME")]
    pub product_name: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl WriteConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.output.as_os_str().is_empty() {
            return Err("output path is required. Set --output or PTIFF_OUTPUT".to_string());
        }
        if self.output.is_dir() {
            return Err(format!("output '{}' is a directory", self.output.display()));
        }
        if self.product_name.is_empty() {
            return Err("product name must not be empty".to_string());
        }
        self.scene.validate()
    }
}

/// Configuration for the `layout` command.
#[derive(Args, Debug, Clone)]
pub struct LayoutConfig {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Absolute offset the IFD starts at.
    #[arg(long, default_value_t = DEFAULT_FIRST_IFD_OFFSET, env = "PTIFF_IFD_OFFSET")]
    pub ifd_offset: u32,

    /// Print the layout as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), String> {
        if u64::from(self.ifd_offset) < crate::format::tiff::TIFF_HEADER_SIZE {
            return Err(format!(
                "IFD offset {} overlaps the 8-byte header",
                self.ifd_offset
            ));
        }
        self.scene.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
