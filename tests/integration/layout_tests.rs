//! Directory layout tests.
//!
//! These exercise the size arithmetic and placement rules through the public
//! API, and check the written directory byte for byte with the minimal reader.

use std::io::Cursor;

use planar_tiff::{
    ByteOrder, DirectoryEntry, FieldType, SampleType, TiffError, TiffIfd, TiffOutputStream,
    TiffTag, TiffValue, IFD_ENTRY_COUNT,
};

use super::test_utils::{declared_product, read_u16, read_u32, seven_types};

fn memory_stream(order: ByteOrder) -> TiffOutputStream<Cursor<Vec<u8>>> {
    TiffOutputStream::new(Cursor::new(Vec::new()), order)
}

// =============================================================================
// Size Arithmetic
// =============================================================================

#[test]
fn test_ifd_size_is_constant() {
    for bands in [1usize, 2, 3, 7, 32] {
        let product = declared_product(10, 20, &vec![SampleType::Float64; bands]);
        let ifd = TiffIfd::new(&product).unwrap();
        assert_eq!(ifd.required_ifd_size(), 174, "{} band(s)", bands);
        assert_eq!(ifd.entries().count(), IFD_ENTRY_COUNT);
    }
}

#[test]
fn test_inline_threshold_by_band_count() {
    let one = TiffIfd::new(&declared_product(10, 20, &[SampleType::UInt8])).unwrap();
    let seven = TiffIfd::new(&declared_product(10, 20, &seven_types())).unwrap();

    for tag in [TiffTag::StripOffsets, TiffTag::StripByteCounts] {
        assert!(!one.get_entry(tag).unwrap().must_values_be_referenced());
        assert!(seven.get_entry(tag).unwrap().must_values_be_referenced());
    }

    // 2 shorts fit, 3 do not
    let two = TiffIfd::new(&declared_product(1, 1, &[SampleType::UInt8; 2])).unwrap();
    let three = TiffIfd::new(&declared_product(1, 1, &[SampleType::UInt8; 3])).unwrap();
    assert!(!two
        .get_entry(TiffTag::BitsPerSample)
        .unwrap()
        .must_values_be_referenced());
    assert!(three
        .get_entry(TiffTag::BitsPerSample)
        .unwrap()
        .must_values_be_referenced());
}

#[test]
fn test_size_decomposition_holds() {
    for types in [vec![SampleType::UInt8], vec![SampleType::Int32; 4], seven_types()] {
        let ifd = TiffIfd::new(&declared_product(13, 7, &types)).unwrap();
        let strips: u64 = ifd.strip_byte_counts().iter().map(|&c| u64::from(c)).sum();

        assert_eq!(ifd.required_size_for_strips(), strips);
        assert_eq!(
            ifd.required_entire_size(),
            ifd.required_ifd_size() + ifd.required_referenced_values_size() + strips
        );
    }
}

#[test]
fn test_seven_band_scenario() {
    let ifd = TiffIfd::new(&declared_product(10, 20, &seven_types())).unwrap();

    assert_eq!(
        ifd.get_entry(TiffTag::BitsPerSample).unwrap().u32_values(),
        vec![32; 7]
    );
    assert_eq!(ifd.strip_byte_counts(), vec![800; 7]);

    let layout = ifd.layout(10);
    let relative: Vec<u64> = layout
        .strip_offsets
        .iter()
        .map(|&o| o - layout.pixel_data_offset)
        .collect();
    assert_eq!(relative, vec![0, 800, 1600, 2400, 3200, 4000, 4800]);
}

#[test]
fn test_empty_product_rejected() {
    let result = TiffIfd::new(&declared_product(10, 20, &[]));
    assert!(matches!(result, Err(TiffError::InvalidArgument(_))));
}

// =============================================================================
// Written Directory
// =============================================================================

#[test]
fn test_negative_offset_writes_nothing() {
    let mut ifd = TiffIfd::new(&declared_product(10, 20, &seven_types())).unwrap();
    let mut stream = memory_stream(ByteOrder::BigEndian);

    let result = ifd.write(&mut stream, -1, 0);
    assert!(matches!(result, Err(TiffError::InvalidArgument(_))));
    assert!(stream.into_inner().into_inner().is_empty());
}

#[test]
fn test_strip_offsets_follow_referenced_values() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let mut ifd = TiffIfd::new(&declared_product(10, 20, &seven_types())).unwrap();
        let mut stream = memory_stream(order);
        ifd.write(&mut stream, 10, 0).unwrap();

        let offsets = ifd.strip_offsets();
        let counts = ifd.strip_byte_counts();
        assert_eq!(
            u64::from(offsets[0]),
            10 + ifd.required_ifd_size() + ifd.required_referenced_values_size()
        );
        for i in 1..offsets.len() {
            assert_eq!(offsets[i], offsets[i - 1] + counts[i - 1]);
        }
    }
}

#[test]
fn test_two_band_write_at_fifty() {
    let product = declared_product(10, 20, &[SampleType::UInt16, SampleType::Float32]);
    let mut ifd = TiffIfd::new(&product).unwrap();
    let mut stream = memory_stream(ByteOrder::BigEndian);
    ifd.write(&mut stream, 50, 0).unwrap();

    let bytes = stream.into_inner().into_inner();
    assert_eq!(
        bytes.len() as u64,
        ifd.required_ifd_size() + ifd.required_referenced_values_size() + 50
    );

    // Referenced payloads are contiguous in ascending tag order
    let values_start = 50 + 174;
    let placed: Vec<(TiffTag, Option<u32>)> = [
        TiffTag::BitsPerSample,
        TiffTag::StripOffsets,
        TiffTag::StripByteCounts,
        TiffTag::XResolution,
        TiffTag::YResolution,
        TiffTag::SampleFormat,
    ]
    .into_iter()
    .map(|tag| (tag, ifd.get_entry(tag).unwrap().values_offset()))
    .collect();

    assert_eq!(
        placed,
        vec![
            (TiffTag::BitsPerSample, None),
            (TiffTag::StripOffsets, Some(values_start)),
            (TiffTag::StripByteCounts, Some(values_start + 8)),
            (TiffTag::XResolution, Some(values_start + 16)),
            (TiffTag::YResolution, Some(values_start + 24)),
            (TiffTag::SampleFormat, None),
        ]
    );
}

#[test]
fn test_directory_entries_ascending_on_disk() {
    let mut ifd = TiffIfd::new(&declared_product(3, 3, &seven_types())).unwrap();
    let order = ByteOrder::LittleEndian;
    let mut stream = memory_stream(order);
    ifd.write(&mut stream, 0, 0).unwrap();
    let bytes = stream.into_inner().into_inner();

    assert_eq!(read_u16(order, &bytes), 14);
    let tags: Vec<u16> = (0..14)
        .map(|i| read_u16(order, &bytes[2 + i * 12..]))
        .collect();
    assert!(tags.windows(2).all(|w| w[0] < w[1]), "{:?}", tags);
    assert_eq!(read_u32(order, &bytes[170..]), 0);
}

#[test]
fn test_layout_json_report() {
    let ifd = TiffIfd::new(&declared_product(10, 20, &seven_types())).unwrap();
    let json = serde_json::to_value(ifd.layout(10)).unwrap();

    assert_eq!(json["ifd_size"], 174);
    assert_eq!(json["values_offset"], 184);
    assert_eq!(json["strip_offsets"].as_array().unwrap().len(), 7);

    let strip_offsets = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == "StripOffsets")
        .unwrap();
    assert_eq!(strip_offsets["inline"], false);
    assert_eq!(strip_offsets["count"], 7);
}

#[test]
fn test_public_array_entries_are_fallible() {
    let empty = DirectoryEntry::new(TiffTag::StripOffsets, Vec::new());
    assert!(matches!(empty, Err(TiffError::InvalidArgument(_))));

    let offsets = DirectoryEntry::new(
        TiffTag::StripOffsets,
        vec![TiffValue::ULong(184), TiffValue::ULong(984)],
    )
    .unwrap();
    assert_eq!(offsets.field_type(), FieldType::Long);
    assert_eq!(offsets.count(), 2);
    assert!(offsets.must_values_be_referenced());
}
