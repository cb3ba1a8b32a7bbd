//! Product writer tests.
//!
//! Files are written to memory and to disk, then parsed back with the minimal
//! reader from `test_utils` to check header, directory and pixel placement.

use std::fs;
use std::io::Cursor;

use planar_tiff::{
    write_product, write_product_to_path, Band, ByteOrder, GeoTiffProductWriter, RasterData,
    SampleType, WriteError, DEFAULT_FIRST_IFD_OFFSET,
};

use super::test_utils::{declared_product, ramp_product, seven_types, ParsedTiff};

fn write_to_memory(product: &planar_tiff::Product, order: ByteOrder) -> ParsedTiff {
    let bytes = write_product(Cursor::new(Vec::new()), product, order)
        .unwrap()
        .into_inner();
    ParsedTiff::parse(bytes)
}

// =============================================================================
// Header and Directory
// =============================================================================

#[test]
fn test_header_and_first_ifd() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let tiff = write_to_memory(&ramp_product(4, 3, &[SampleType::UInt8]), order);

        assert_eq!(tiff.byte_order, order);
        assert_eq!(tiff.first_ifd_offset, DEFAULT_FIRST_IFD_OFFSET);
        assert_eq!(tiff.entries.len(), 14);
        assert_eq!(tiff.next_ifd_offset, 0);
    }
}

#[test]
fn test_directory_values_read_back() {
    let types = seven_types();
    let tiff = write_to_memory(&ramp_product(10, 20, &types), ByteOrder::BigEndian);

    assert_eq!(tiff.integers(256), vec![10]);
    assert_eq!(tiff.integers(257), vec![20]);
    assert_eq!(tiff.integers(258), vec![32; 7]);
    assert_eq!(tiff.integers(259), vec![1]);
    assert_eq!(tiff.integers(262), vec![1]);
    assert_eq!(tiff.integers(277), vec![7]);
    assert_eq!(tiff.integers(278), vec![20]);
    assert_eq!(tiff.integers(279), vec![800; 7]);
    assert_eq!(tiff.integers(284), vec![2]);
    assert_eq!(tiff.integers(296), vec![1]);
    assert_eq!(tiff.integers(339), vec![3; 7]);
    assert_eq!(tiff.rational(282), (1, 1));
    assert_eq!(tiff.rational(283), (1, 1));

    let offsets = tiff.integers(273);
    let pixel_start = offsets[0];
    for (i, offset) in offsets.iter().enumerate() {
        assert_eq!(*offset, pixel_start + 800 * i as u32);
    }
    assert_eq!(tiff.file_len(), offsets[6] as usize + 800);
}

#[test]
fn test_file_size_matches_required_size() {
    let product = ramp_product(10, 20, &seven_types());
    let writer =
        GeoTiffProductWriter::create(Cursor::new(Vec::new()), &product, ByteOrder::BigEndian)
            .unwrap();
    let expected =
        u64::from(DEFAULT_FIRST_IFD_OFFSET) + writer.ifd().required_entire_size();
    assert_eq!(writer.required_file_size(), expected);

    let tiff = write_to_memory(&product, ByteOrder::BigEndian);
    assert_eq!(tiff.file_len() as u64, expected);
}

// =============================================================================
// Pixel Data
// =============================================================================

#[test]
fn test_band_samples_normalized_to_f32() {
    let types = seven_types();
    let product = ramp_product(10, 20, &types);
    let tiff = write_to_memory(&product, ByteOrder::LittleEndian);

    for (band_index, band) in product.bands().iter().enumerate() {
        let data = band.data().unwrap();
        for pixel in [0usize, 1, 57, 199] {
            assert_eq!(
                tiff.sample(band_index, pixel),
                data.value_f32(pixel).unwrap(),
                "band {} pixel {}",
                band.name(),
                pixel
            );
        }
    }
}

#[test]
fn test_float64_band_narrowed() {
    let mut product = planar_tiff::Product::new("p", "TEST", 2, 1);
    product
        .add_band(Band::with_data("d", RasterData::Float64(vec![0.1, -2.5])))
        .unwrap();

    let tiff = write_to_memory(&product, ByteOrder::BigEndian);
    assert_eq!(tiff.integers(258), vec![32]);
    assert_eq!(tiff.sample(0, 0), 0.1f64 as f32);
    assert_eq!(tiff.sample(0, 1), -2.5);
}

#[test]
fn test_band_written_in_regions() {
    let product = declared_product(6, 4, &[SampleType::UInt16, SampleType::UInt16]);
    let order = ByteOrder::BigEndian;
    let mut writer = GeoTiffProductWriter::create(Cursor::new(Vec::new()), &product, order)
        .unwrap();

    // Second band first, split into left and right halves
    let right = RasterData::UInt16((0..12).map(|v| v + 500).collect());
    writer
        .write_band_raster_data("band_2", 3, 0, 3, 4, &right)
        .unwrap();
    let left = RasterData::UInt16((0..12).collect());
    writer
        .write_band_raster_data("band_2", 0, 0, 3, 4, &left)
        .unwrap();

    let tiff = ParsedTiff::parse(writer.finish().unwrap().into_inner());
    for row in 0..4usize {
        for col in 0..6usize {
            let expected = if col < 3 {
                (row * 3 + col) as f32
            } else {
                (500 + row * 3 + col - 3) as f32
            };
            assert_eq!(tiff.sample(1, row * 6 + col), expected);
        }
    }

    // Untouched band stays zero-filled
    assert_eq!(tiff.sample(0, 0), 0.0);
    assert_eq!(tiff.sample(0, 23), 0.0);
}

#[test]
fn test_band_not_in_product_rejected() {
    let product = ramp_product(4, 4, &[SampleType::UInt8]);
    let mut writer =
        GeoTiffProductWriter::create(Cursor::new(Vec::new()), &product, ByteOrder::BigEndian)
            .unwrap();

    let outsider = Band::with_data("notInProduct", RasterData::UInt8(vec![0; 16]));
    let err = writer.write_band(&outsider).unwrap_err();
    assert!(matches!(err, WriteError::BandNotInProduct(_)));
    assert!(err.to_string().contains("band"));
}

// =============================================================================
// Files on Disk
// =============================================================================

#[test]
fn test_write_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");
    let product = ramp_product(10, 20, &[SampleType::Int16, SampleType::Float32]);

    let size = write_product_to_path(&path, &product, ByteOrder::LittleEndian).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, size);

    let tiff = ParsedTiff::parse(bytes);
    assert_eq!(tiff.sample(1, 0), 100.5);
}

#[test]
fn test_overwrite_crops_larger_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");

    let large = ramp_product(64, 64, &seven_types());
    let large_size = write_product_to_path(&path, &large, ByteOrder::BigEndian).unwrap();

    let small = ramp_product(10, 20, &[SampleType::UInt8]);
    let small_size = write_product_to_path(&path, &small, ByteOrder::BigEndian).unwrap();

    let writer =
        GeoTiffProductWriter::create(Cursor::new(Vec::new()), &small, ByteOrder::BigEndian)
            .unwrap();
    assert!(small_size < large_size);
    assert_eq!(small_size, writer.required_file_size());
    assert_eq!(fs::metadata(&path).unwrap().len(), small_size);

    let tiff = ParsedTiff::parse(fs::read(&path).unwrap());
    assert_eq!(tiff.integers(277), vec![1]);
    assert_eq!(tiff.sample(0, 199), 199.0);
}

#[test]
fn test_overwrite_extends_smaller_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");
    fs::write(&path, b"stale").unwrap();

    let product = ramp_product(8, 8, &[SampleType::UInt32; 3]);
    let size = write_product_to_path(&path, &product, ByteOrder::LittleEndian).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, size);
    assert_eq!(&bytes[0..2], b"II");
}
