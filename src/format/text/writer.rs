use std::io::Write;

use crate::dataset::{GridData, Samples};
use crate::error::IoError;
use crate::grid::{DenseGrid, Element, Scalar};

use super::reader::TextFlavor;

/// Most components written per line: real and imaginary.
pub const MAX_WRITTEN_COMPONENTS: usize = 2;

/// Write a grid as one text line per cell.
///
/// Each line holds the 1-based coordinate of the cell followed by at most two
/// component values. With [`TextFlavor::PipeExport`] axis 1 is written
/// mirrored, matching what the reader undoes, so a real or complex grid
/// survives a write and read unchanged.
pub fn write_text<E, W>(grid: &DenseGrid<E>, writer: &mut W, flavor: TextFlavor) -> Result<(), IoError>
where
    E: Element,
    W: Write + ?Sized,
{
    let mirror = flavor == TextFlavor::PipeExport && grid.rank() >= 2;
    let height = grid.extents().get(1).copied().unwrap_or(1);

    let mut line = String::new();
    for (cell, coord) in grid.as_slice().iter().zip(grid.coordinates()) {
        line.clear();
        for (axis, &c) in coord.iter().enumerate() {
            let c = if mirror && axis == 1 { height - 1 - c } else { c };
            if axis > 0 {
                line.push(' ');
            }
            line.push_str(&(c + 1).to_string());
        }
        for value in cell.components().iter().take(MAX_WRITTEN_COMPONENTS) {
            line.push(' ');
            line.push_str(&value.to_f64().to_string());
        }
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .map_err(|e| IoError::Read(format!("write failed: {}", e)))?;
    }
    Ok(())
}

/// Write any decoded samples, whatever their kind and precision.
pub fn write_samples<W>(samples: &Samples, writer: &mut W, flavor: TextFlavor) -> Result<(), IoError>
where
    W: Write + ?Sized,
{
    match samples {
        Samples::Single(data) => write_grid_data(data, writer, flavor),
        Samples::Double(data) => write_grid_data(data, writer, flavor),
    }
}

fn write_grid_data<T, W>(data: &GridData<T>, writer: &mut W, flavor: TextFlavor) -> Result<(), IoError>
where
    T: Scalar,
    W: Write + ?Sized,
{
    match data {
        GridData::Real(g) => write_text(g, writer, flavor),
        GridData::Complex(g) => write_text(g, writer, flavor),
        GridData::Quaternion(g) => write_text(g, writer, flavor),
        GridData::Octonion(g) => write_text(g, writer, flavor),
    }
}
