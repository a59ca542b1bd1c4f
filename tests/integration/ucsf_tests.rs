//! UCSF (Sparky) decoding tests.

use nmr_ingest::{read_ucsf, ElementKind, UcsfError};

use super::test_utils::{temp_source, ucsf_header, ucsf_payload_2d, ucsf_value, UcsfAxisSpec};

fn two_axis_file() -> Vec<u8> {
    let mut bytes = ucsf_header(
        1,
        &[UcsfAxisSpec::new("15N", 10, 4), UcsfAxisSpec::new("1H", 5, 5)],
    );
    bytes.extend(ucsf_payload_2d([10, 5], [4, 5]));
    bytes
}

#[test]
fn test_tiles_reassembled_and_axes_reversed() {
    let (_file, source) = temp_source(&two_axis_file(), ".ucsf");
    let dataset = read_ucsf(&source).unwrap().expect("UCSF signature");

    assert_eq!(dataset.kind(), ElementKind::Real);
    assert_eq!(dataset.extents(), &[5, 10]);

    for s0 in 0..10 {
        for s1 in 0..5 {
            assert_eq!(
                dataset.samples().components_at(&[s1, 9 - s0]),
                Some(vec![ucsf_value(s0, s1) as f64]),
                "stored ({}, {})",
                s0,
                s1
            );
        }
    }
}

#[test]
fn test_padding_never_leaks() {
    let (_file, source) = temp_source(&two_axis_file(), ".ucsf");
    let dataset = read_ucsf(&source).unwrap().unwrap();

    for x in 0..5 {
        for y in 0..10 {
            let value = dataset.samples().components_at(&[x, y]).unwrap();
            assert!(value[0].is_finite());
        }
    }
}

#[test]
fn test_axis_summaries_follow_output_order() {
    let (_file, source) = temp_source(&two_axis_file(), ".ucsf");
    let dataset = read_ucsf(&source).unwrap().unwrap();

    let labels: Vec<&str> = dataset.axes().iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["1H", "15N"]);
    assert_eq!(dataset.axes()[1].size, 10);

    let owner = dataset.provenance().get("owner").and_then(|v| v.as_text());
    assert_eq!(owner, Some("sparky"));
}

#[test]
fn test_not_ucsf_is_not_an_error() {
    let (_file, source) = temp_source(b"1 1 0.5\n2 1 0.25\n", ".txt");
    assert!(read_ucsf(&source).unwrap().is_none());
}

#[test]
fn test_dimension_count_bounds() {
    let mut zero = ucsf_header(1, &[]);
    zero.extend(vec![0u8; 256]);
    let (_file, source) = temp_source(&zero, ".ucsf");
    assert!(matches!(read_ucsf(&source), Err(UcsfError::BadDimCount(0))));

    let axes = vec![UcsfAxisSpec::new("1H", 1, 1); 5];
    let (_file, source) = temp_source(&ucsf_header(1, &axes), ".ucsf");
    assert!(matches!(read_ucsf(&source), Err(UcsfError::BadDimCount(5))));
}

#[test]
fn test_component_count_too_large() {
    let (_file, source) = temp_source(&ucsf_header(9, &[UcsfAxisSpec::new("1H", 4, 4)]), ".ucsf");
    assert!(matches!(
        read_ucsf(&source),
        Err(UcsfError::UnsupportedComponentCount(9))
    ));
}

#[test]
fn test_truncated_payload() {
    let mut bytes = two_axis_file();
    bytes.truncate(bytes.len() - 4);
    let (_file, source) = temp_source(&bytes, ".ucsf");
    assert!(matches!(
        read_ucsf(&source),
        Err(UcsfError::SizeMismatch { .. })
    ));
}
