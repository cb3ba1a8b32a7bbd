//! planar-tiff - write raster products as planar float32 TIFF files.
//!
//! This binary builds synthetic products from the command line and either
//! writes them or reports their file layout.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planar_tiff::{
    config::{Cli, Command, LayoutConfig, SceneArgs, WriteConfig},
    write_product_to_path, Band, ByteOrder, Product, RasterData, TiffIfd,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Write(config) => run_write(config),
        Command::Layout(config) => run_layout(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "planar_tiff=debug"
    } else {
        "planar_tiff=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build a product whose bands hold offset ramps, one band per sample type.
fn build_product(name: &str, scene: &SceneArgs) -> Result<Product, String> {
    let mut product = Product::new(name, "SYNTHETIC", scene.width, scene.height);
    let len = scene.width as usize * scene.height as usize;

    for (i, &sample_type) in scene.bands.iter().enumerate() {
        let data = RasterData::fill_ramp(sample_type, len, (i as u32) * 1000);
        product
            .add_band(Band::with_data(format!("band_{}", i + 1), data))
            .map_err(|e| e.to_string())?;
    }
    Ok(product)
}

// =============================================================================
// Write Command
// =============================================================================

fn run_write(config: WriteConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let product = match build_product(&config.product_name, &config.scene) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to build product: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let byte_order = ByteOrder::from(config.byte_order);
    info!(
        "Writing {}x{} product with {} band(s), {}",
        product.width(),
        product.height(),
        product.num_bands(),
        byte_order.name()
    );

    match write_product_to_path(&config.output, &product, byte_order) {
        Ok(size) => {
            println!("{} ({} bytes)", config.output.display(), size);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write {}: {}", config.output.display(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Layout Command
// =============================================================================

fn run_layout(config: LayoutConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut product = Product::new("layout", "SYNTHETIC", config.scene.width, config.scene.height);
    for (i, &sample_type) in config.scene.bands.iter().enumerate() {
        if let Err(e) = product.add_band(Band::new(format!("band_{}", i + 1), sample_type)) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let ifd = match TiffIfd::new(&product) {
        Ok(ifd) => ifd,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let layout = ifd.layout(u64::from(config.ifd_offset));

    if config.json {
        match serde_json::to_string_pretty(&layout) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("IFD Layout");
    println!("══════════");
    println!();
    println!("  Directory:        {:>10}  ({} bytes)", layout.ifd_offset, layout.ifd_size);
    println!("  Referenced data:  {:>10}  ({} bytes)", layout.values_offset, layout.values_size);
    println!(
        "  Pixel data:       {:>10}  ({} bytes)",
        layout.pixel_data_offset, layout.strips_size
    );
    println!("  End of file:      {:>10}", layout.end_offset);
    println!();
    println!(
        "  {:<6} {:<26} {:<9} {:>6} {:>6}  {}",
        "Tag", "Name", "Type", "Count", "Bytes", "Value"
    );
    for entry in &layout.entries {
        let placement = match entry.values_offset {
            Some(offset) => format!("@ {}", offset),
            None => "inline".to_string(),
        };
        println!(
            "  {:<6} {:<26} {:<9} {:>6} {:>6}  {}",
            entry.tag, entry.name, entry.field_type, entry.count, entry.size_in_bytes, placement
        );
    }
    println!();
    for (i, (offset, count)) in layout
        .strip_offsets
        .iter()
        .zip(&layout.strip_byte_counts)
        .enumerate()
    {
        println!("  Strip {:<4} {:>10}  ({} bytes)", i + 1, offset, count);
    }

    ExitCode::SUCCESS
}
