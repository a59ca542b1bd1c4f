//! Format detection and dispatch tests.

use nmr_ingest::io::ByteOrder;
use nmr_ingest::{
    detect_format, read_all_datasets, ElementKind, FileFormat, FormatError, Probe, ReadOptions,
    TextFlavor, TextOptions,
};

use super::test_utils::{
    temp_source, ucsf_header, ucsf_payload_2d, PipeFileBuilder, UcsfAxisSpec,
};

fn pipe_bytes(order: ByteOrder) -> Vec<u8> {
    PipeFileBuilder::new(order)
        .one_d(3, false)
        .data(&[0.5, 1.5, 2.5])
        .build()
}

fn ucsf_bytes() -> Vec<u8> {
    let mut bytes = ucsf_header(1, &[UcsfAxisSpec::new("1H", 4, 2), UcsfAxisSpec::new("13C", 2, 2)]);
    bytes.extend(ucsf_payload_2d([4, 2], [2, 2]));
    bytes
}

#[test]
fn test_detects_each_format() {
    let cases: Vec<(Vec<u8>, FileFormat)> = vec![
        (pipe_bytes(ByteOrder::BigEndian), FileFormat::Pipe),
        (pipe_bytes(ByteOrder::LittleEndian), FileFormat::Pipe),
        (ucsf_bytes(), FileFormat::Ucsf),
        (b"1 1 0.5\n2 1 0.25\n".to_vec(), FileFormat::Text),
    ];

    for (bytes, format) in cases {
        let (_file, source) = temp_source(&bytes, ".dat");
        assert_eq!(detect_format(&source).unwrap(), Probe::Matched(format));
    }
}

#[test]
fn test_read_all_datasets_dispatches() {
    let (_file, source) = temp_source(&pipe_bytes(ByteOrder::LittleEndian), ".fid");
    let bundle = read_all_datasets(&source, &ReadOptions::default()).unwrap();
    assert_eq!(bundle.len(), 1);
    let dataset = bundle.first().unwrap();
    assert_eq!(dataset.kind(), ElementKind::Real);
    assert_eq!(dataset.extents(), &[3]);
    assert_eq!(dataset.samples().components_at(&[2]), Some(vec![2.5]));

    let (_file, source) = temp_source(&ucsf_bytes(), ".ucsf");
    let bundle = read_all_datasets(&source, &ReadOptions::default()).unwrap();
    assert_eq!(bundle.first().unwrap().extents(), &[2, 4]);
}

#[test]
fn test_forced_text_flavor() {
    let (_file, source) = temp_source(b"1 1 0.5\n1 2 0.25\n", ".txt");
    let options = ReadOptions {
        format: Some(FileFormat::Text),
        text: TextOptions {
            flavor: TextFlavor::PipeExport,
            coordinate_columns: None,
        },
    };
    let bundle = read_all_datasets(&source, &options).unwrap();
    let dataset = bundle.first().unwrap();
    assert_eq!(dataset.samples().components_at(&[0, 0]), Some(vec![0.25]));
    assert_eq!(dataset.samples().components_at(&[0, 1]), Some(vec![0.5]));
}

#[test]
fn test_unrecognized_content() {
    let (_file, source) = temp_source(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], ".jpg");
    assert_eq!(detect_format(&source).unwrap(), Probe::NotMatched);
    assert!(matches!(
        read_all_datasets(&source, &ReadOptions::default()),
        Err(FormatError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_forced_ucsf_on_other_content() {
    let (_file, source) = temp_source(b"1 1 0.5\n", ".txt");
    let options = ReadOptions {
        format: Some(FileFormat::Ucsf),
        ..ReadOptions::default()
    };
    assert!(matches!(
        read_all_datasets(&source, &options),
        Err(FormatError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_forced_pipe_reports_pipe_error() {
    let (_file, source) = temp_source(b"1 1 0.5\n", ".txt");
    let options = ReadOptions {
        format: Some(FileFormat::Pipe),
        ..ReadOptions::default()
    };
    assert!(matches!(
        read_all_datasets(&source, &options),
        Err(FormatError::Pipe(_))
    ));
}
