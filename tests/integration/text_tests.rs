//! Sparse text decoding and writing tests.

use nmr_ingest::{
    read_text, write_samples, Dataset, ElementKind, MemorySource, TextError, TextFlavor,
    TextOptions,
};

use super::test_utils::{temp_source, text_rows};

// =============================================================================
// Helpers
// =============================================================================

fn read(text: &str, flavor: TextFlavor) -> Result<Dataset, TextError> {
    let source = MemorySource::new(text.to_string(), "mem.txt");
    read_text(
        &source,
        &TextOptions {
            flavor,
            coordinate_columns: None,
        },
    )
}

fn assert_same_cells(a: &Dataset, b: &Dataset) {
    assert_eq!(a.kind(), b.kind());
    assert_eq!(a.extents(), b.extents());
    let extents = a.extents();
    for y in 0..extents[1] {
        for x in 0..extents[0] {
            assert_eq!(
                a.samples().components_at(&[x, y]),
                b.samples().components_at(&[x, y]),
                "cell ({}, {})",
                x,
                y
            );
        }
    }
}

fn full_grid() -> Vec<(i64, i64, f64)> {
    let mut rows = Vec::new();
    for y in 1..=3 {
        for x in 1..=4 {
            rows.push((x, y, x as f64 * 0.5 + y as f64 * 0.125 + 0.01));
        }
    }
    rows
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_row_order_does_not_change_grid() {
    let rows = full_grid();
    let mut shuffled = rows.clone();
    shuffled.reverse();
    shuffled.swap(0, 5);
    shuffled.swap(3, 9);

    let a = read(&text_rows(&rows), TextFlavor::Plain).unwrap();
    let b = read(&text_rows(&shuffled), TextFlavor::Plain).unwrap();
    assert_same_cells(&a, &b);
}

#[test]
fn test_sparse_cells_stay_zero() {
    let dataset = read("1 1 0.5\n3 2 -1.25\n", TextFlavor::Plain).unwrap();
    assert_eq!(dataset.kind(), ElementKind::Real);
    assert_eq!(dataset.extents(), &[3, 2]);
    assert_eq!(dataset.samples().components_at(&[0, 0]), Some(vec![0.5]));
    assert_eq!(dataset.samples().components_at(&[2, 1]), Some(vec![-1.25]));
    assert_eq!(dataset.samples().components_at(&[1, 0]), Some(vec![0.0]));
}

#[test]
fn test_pipe_export_reads_mirrored() {
    let text = "1 1 0.5\n1 2 0.75\n1 3 0.25\n";
    let plain = read(text, TextFlavor::Plain).unwrap();
    let mirrored = read(text, TextFlavor::PipeExport).unwrap();

    for y in 0..3 {
        assert_eq!(
            plain.samples().components_at(&[0, y]),
            mirrored.samples().components_at(&[0, 2 - y])
        );
    }
}

#[test]
fn test_empty_file() {
    assert!(matches!(
        read("", TextFlavor::Plain),
        Err(TextError::NoDimensionColumns)
    ));
    assert!(matches!(
        read("\n   \n", TextFlavor::Plain),
        Err(TextError::NoDimensionColumns)
    ));
}

#[test]
fn test_ragged_rows_rejected() {
    let result = read("1 1 0.5\n2 1 0.5 0.25\n", TextFlavor::Plain);
    assert!(matches!(
        result,
        Err(TextError::ColumnCountMismatch {
            expected: 3,
            actual: 4,
            ..
        })
    ));
}

// =============================================================================
// Round Trips
// =============================================================================

fn write(dataset: &Dataset, flavor: TextFlavor) -> String {
    let mut out = Vec::new();
    write_samples(dataset.samples(), &mut out, flavor).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_plain_write_then_read() {
    let original = read(&text_rows(&full_grid()), TextFlavor::Plain).unwrap();
    let written = write(&original, TextFlavor::Plain);
    let reread = read(&written, TextFlavor::Plain).unwrap();
    assert_same_cells(&original, &reread);
}

#[test]
fn test_pipe_export_write_then_read() {
    let original = read(&text_rows(&full_grid()), TextFlavor::Plain).unwrap();
    let written = write(&original, TextFlavor::PipeExport);
    assert_ne!(written, write(&original, TextFlavor::Plain));

    let reread = read(&written, TextFlavor::PipeExport).unwrap();
    assert_same_cells(&original, &reread);
}

#[test]
fn test_complex_round_trip_through_file() {
    let text = "1 1 0.5 -0.5\n2 1 1.5 0.25\n1 2 -2.5 0.75\n2 2 3.5 -1.125\n";
    let original = read(text, TextFlavor::Plain).unwrap();
    assert_eq!(original.kind(), ElementKind::Complex);

    let written = write(&original, TextFlavor::Plain);
    let (_file, source) = temp_source(written.as_bytes(), ".txt");
    let reread = read_text(&source, &TextOptions::default()).unwrap();
    assert_same_cells(&original, &reread);
}
