//! NMRPipe decoding tests.
//!
//! Files are written to disk and read back through `FileSource`.

use nmr_ingest::io::ByteOrder;
use nmr_ingest::{read_pipe, ElementKind, PipeError, PipeField};

use super::test_utils::{temp_source, PipeFileBuilder};

// =============================================================================
// Decoding
// =============================================================================

fn one_d_complex(order: ByteOrder) -> Vec<u8> {
    PipeFileBuilder::new(order)
        .one_d(4, true)
        .text(PipeField::F2Label, "HN")
        .float(PipeField::F2Obs, 600.13)
        .float(PipeField::F2Sw, 8000.0)
        .text(PipeField::Title, "HSQC test")
        .data(&[1.0, 2.0, 3.0, 4.0, 0.5, -0.5, 1.5, -1.5])
        .build()
}

#[test]
fn test_one_d_complex() {
    let (_file, source) = temp_source(&one_d_complex(ByteOrder::BigEndian), ".fid");
    let dataset = read_pipe(&source).unwrap();

    assert_eq!(dataset.kind(), ElementKind::Complex);
    assert_eq!(dataset.extents(), &[4]);

    let expected = [(1.0, 0.5), (2.0, -0.5), (3.0, 1.5), (4.0, -1.5)];
    for (i, (re, im)) in expected.iter().enumerate() {
        assert_eq!(
            dataset.samples().components_at(&[i]),
            Some(vec![*re, *im]),
            "point {}",
            i
        );
    }
}

#[test]
fn test_byte_orders_decode_identically() {
    let (_be_file, be_source) = temp_source(&one_d_complex(ByteOrder::BigEndian), ".fid");
    let (_le_file, le_source) = temp_source(&one_d_complex(ByteOrder::LittleEndian), ".fid");

    let be = read_pipe(&be_source).unwrap();
    let le = read_pipe(&le_source).unwrap();

    assert_eq!(be.extents(), le.extents());
    for i in 0..4 {
        assert_eq!(
            be.samples().components_at(&[i]),
            le.samples().components_at(&[i])
        );
    }

    let order = |d: &nmr_ingest::Dataset| {
        d.provenance()
            .get("byte order")
            .and_then(|v| v.as_text())
            .map(str::to_string)
    };
    assert_eq!(order(&be).as_deref(), Some("big-endian"));
    assert_eq!(order(&le).as_deref(), Some("little-endian"));
}

#[test]
fn test_header_metadata() {
    let (_file, source) = temp_source(&one_d_complex(ByteOrder::LittleEndian), ".fid");
    let dataset = read_pipe(&source).unwrap();

    let title = dataset.provenance().get("title").and_then(|v| v.as_text());
    assert_eq!(title, Some("HSQC test"));

    let axis = &dataset.axes()[0];
    assert_eq!(axis.label, "HN");
    assert_eq!(axis.size, 4);
    let obs = axis.observe_mhz.unwrap();
    assert!((obs - 600.13).abs() < 1e-3);
    assert_eq!(axis.sweep_width_hz, Some(8000.0));
}

#[test]
fn test_little_endian_text_fields_in_file_order() {
    let mut bytes = PipeFileBuilder::new(ByteOrder::LittleEndian)
        .one_d(1, false)
        .data(&[1.0])
        .build();
    let title = PipeField::Title.offset() * 4;
    bytes[title..title + 4].copy_from_slice(b"HSQC");
    let label = PipeField::F2Label.offset() * 4;
    bytes[label..label + 2].copy_from_slice(b"1H");
    let (_file, source) = temp_source(&bytes, ".fid");

    let dataset = read_pipe(&source).unwrap();
    let title = dataset.provenance().get("title").and_then(|v| v.as_text());
    assert_eq!(title, Some("HSQC"));
    assert_eq!(dataset.axes()[0].label, "1H");
}

#[test]
fn test_two_d_real_flips_rows() {
    let floats: Vec<f32> = (0..3)
        .flat_map(|row| (0..4).map(move |x| (row * 10 + x) as f32))
        .collect();
    let bytes = PipeFileBuilder::new(ByteOrder::BigEndian)
        .two_d_real(4, 3)
        .data(&floats)
        .build();
    let (_file, source) = temp_source(&bytes, ".ft2");

    let dataset = read_pipe(&source).unwrap();
    assert_eq!(dataset.kind(), ElementKind::Real);
    assert_eq!(dataset.extents(), &[4, 3]);
    assert_eq!(dataset.axes().len(), 2);

    for y in 0..3 {
        for x in 0..4 {
            let stored_row = 2 - y;
            assert_eq!(
                dataset.samples().components_at(&[x, y]),
                Some(vec![(stored_row * 10 + x) as f64])
            );
        }
    }
}

// =============================================================================
// Boundary Checks
// =============================================================================

#[test]
fn test_file_one_byte_short_of_header() {
    let (_file, source) = temp_source(&vec![0u8; 2047], ".fid");
    assert!(matches!(
        read_pipe(&source),
        Err(PipeError::TooSmall {
            required: 2048,
            actual: 2047
        })
    ));
}

#[test]
fn test_payload_not_whole_floats() {
    let mut bytes = PipeFileBuilder::new(ByteOrder::BigEndian).one_d(1, false).build();
    bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let (_file, source) = temp_source(&bytes, ".fid");
    assert!(matches!(
        read_pipe(&source),
        Err(PipeError::MisalignedLength { length: 2054 })
    ));
}

#[test]
fn test_nan_byte_order_marker() {
    let bytes = PipeFileBuilder::new(ByteOrder::BigEndian)
        .one_d(1, false)
        .raw_word(PipeField::FltOrder.offset(), 0x7FC0_0000)
        .data(&[1.0])
        .build();
    let (_file, source) = temp_source(&bytes, ".fid");
    assert!(matches!(
        read_pipe(&source),
        Err(PipeError::BadByteOrderMarker)
    ));
}

#[test]
fn test_nonzero_magic() {
    let bytes = PipeFileBuilder::new(ByteOrder::LittleEndian)
        .one_d(1, false)
        .raw_word(0, 7)
        .data(&[1.0])
        .build();
    let (_file, source) = temp_source(&bytes, ".fid");
    assert!(matches!(read_pipe(&source), Err(PipeError::BadMagic(7))));
}

#[test]
fn test_dimension_count_out_of_range() {
    let bytes = PipeFileBuilder::new(ByteOrder::BigEndian)
        .one_d(1, false)
        .float(PipeField::DimCount, 5.0)
        .data(&[1.0])
        .build();
    let (_file, source) = temp_source(&bytes, ".fid");
    assert!(matches!(read_pipe(&source), Err(PipeError::BadDimCount(5))));
}

#[test]
fn test_payload_shorter_than_header_claims() {
    let bytes = PipeFileBuilder::new(ByteOrder::BigEndian)
        .one_d(4, false)
        .data(&[1.0, 2.0, 3.0])
        .build();
    let (_file, source) = temp_source(&bytes, ".fid");
    assert!(matches!(
        read_pipe(&source),
        Err(PipeError::SizeMismatch {
            expected: 4,
            actual: 3
        })
    ));
}
