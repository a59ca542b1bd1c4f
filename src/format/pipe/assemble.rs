//! Reconstruction of the dense grid from the pipe float stream.
//!
//! Within each row along axis 1 the stream holds every real sample of the
//! row, then every imaginary sample, then (quaternion) the j and k channels.
//! Cells are rebuilt one channel at a time in that order. Afterwards axis 1
//! is mirrored so the first stored row ends up last.

use tracing::debug;

use crate::dataset::GridData;
use crate::error::PipeError;
use crate::grid::{DenseGrid, Element, ElementKind};

use super::fields::PipeField;
use super::header::PipeHeader;

// =============================================================================
// Layout
// =============================================================================

/// Element kind implied by the quadrature flags of the first two logical axes.
pub fn data_type(header: &PipeHeader) -> Result<ElementKind, PipeError> {
    let dims = header.dim_count()?;

    let mut components = if axis_is_real(header, 1) { 1 } else { 2 };
    if dims >= 2 {
        components *= if axis_is_real(header, 2) { 1 } else { 2 };
    }

    match components {
        1 => Ok(ElementKind::Real),
        2 => Ok(ElementKind::Complex),
        4 => Ok(ElementKind::Quaternion),
        _ => Err(PipeError::UnsupportedPointFormat { components }),
    }
}

/// Per-axis extents counted in stored floats, before component division.
pub fn raw_extents(header: &PipeHeader) -> Result<Vec<usize>, PipeError> {
    let dims = header.dim_count()?;
    let size = count(header, PipeField::Size);

    if dims == 1 {
        let factor = if axis_is_real(header, 1) { 1 } else { 2 };
        return Ok(vec![size * factor]);
    }

    let transposed = header.get_count(PipeField::Transposed);
    let floats_per_record = if (axis_is_real(header, 2) && transposed == 1)
        || (axis_is_real(header, 1) && transposed == 0)
    {
        1
    } else {
        2
    };

    let spec_num = count(header, PipeField::SpecNum);
    let y = if header.get_count(PipeField::QuadFlag) == 0 && floats_per_record == 1 {
        2 * spec_num
    } else {
        spec_num
    };

    let mut extents = vec![size * floats_per_record, y];
    if header.get_count(PipeField::PipeFlag) != 0 {
        if dims >= 3 {
            extents.push(count(header, PipeField::F3Size));
        }
        if dims == 4 {
            extents.push(count(header, PipeField::F4Size));
        }
    }
    Ok(extents)
}

/// Derived shape of a pipe payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeLayout {
    pub kind: ElementKind,
    /// Extents in floats as the header states them
    pub raw_extents: Vec<usize>,
    /// Extents in elements, after dividing out the components
    pub extents: Vec<usize>,
}

impl PipeLayout {
    /// Work out the grid shape for `float_count` payload floats.
    ///
    /// # Errors
    /// - `BadDimCount` / `UnsupportedPointFormat` from the header
    /// - `SizeMismatch` if the extents do not account for every float, or
    ///   the component axis is not a whole number of elements
    /// - `UnimplementedHigherDimComplex` for 3-D and 4-D non-real data
    pub fn from_header(header: &PipeHeader, float_count: u64) -> Result<Self, PipeError> {
        let kind = data_type(header)?;
        let raw_extents = raw_extents(header)?;

        let expected = raw_extents
            .iter()
            .try_fold(1u64, |acc, &e| acc.checked_mul(e as u64))
            .unwrap_or(u64::MAX);
        if expected != float_count {
            return Err(PipeError::SizeMismatch {
                expected,
                actual: float_count,
            });
        }

        if raw_extents.len() >= 3 && kind != ElementKind::Real {
            return Err(PipeError::UnimplementedHigherDimComplex {
                kind: kind.name(),
                dims: raw_extents.len(),
            });
        }

        let components = kind.component_count();
        let axis = if raw_extents.len() == 1 { 0 } else { 1 };
        let mut extents = raw_extents.clone();
        if extents[axis] % components != 0 {
            return Err(PipeError::SizeMismatch {
                expected: (extents[axis] / components * components) as u64,
                actual: extents[axis] as u64,
            });
        }
        extents[axis] /= components;

        debug!(
            kind = %kind,
            raw_extents = ?raw_extents,
            extents = ?extents,
            "Resolved NMRPipe layout"
        );

        Ok(Self {
            kind,
            raw_extents,
            extents,
        })
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Build the dense grid for a header and its full payload.
pub fn assemble(header: &PipeHeader, floats: &[f32]) -> Result<GridData<f32>, PipeError> {
    let layout = PipeLayout::from_header(header, floats.len() as u64)?;
    assemble_layout(&layout, floats)
}

/// Build the dense grid once the layout is known.
pub fn assemble_layout(layout: &PipeLayout, floats: &[f32]) -> Result<GridData<f32>, PipeError> {
    let data = match layout.kind {
        ElementKind::Real => GridData::Real(deinterleave(&layout.extents, floats)?),
        ElementKind::Complex => GridData::Complex(deinterleave(&layout.extents, floats)?),
        ElementKind::Quaternion => GridData::Quaternion(deinterleave(&layout.extents, floats)?),
        ElementKind::Octonion => {
            return Err(PipeError::UnsupportedPointFormat { components: 8 });
        }
    };
    Ok(data)
}

/// Rebuild cells row by row from channel-major rows, then mirror axis 1.
fn deinterleave<E>(extents: &[usize], floats: &[f32]) -> Result<DenseGrid<E>, PipeError>
where
    E: Element<Scalar = f32>,
{
    let mut grid = DenseGrid::<E>::allocate(extents)?;
    let components = E::KIND.component_count();
    let expected = grid.len() * components;
    if floats.len() != expected {
        return Err(PipeError::SizeMismatch {
            expected: expected as u64,
            actual: floats.len() as u64,
        });
    }

    let row_len = extents[0];
    let cells = grid.as_mut_slice();
    for (row, record) in floats.chunks_exact(row_len * components).enumerate() {
        let base = row * row_len;
        for (channel, values) in record.chunks_exact(row_len).enumerate() {
            for (i, &value) in values.iter().enumerate() {
                cells[base + i].set_component(channel, value);
            }
        }
    }

    if extents.len() >= 2 {
        grid.flip_axis(1)?;
    }
    Ok(grid)
}

fn axis_is_real(header: &PipeHeader, axis: usize) -> bool {
    header.axis(axis).map_or(false, |a| a.is_real())
}

fn count(header: &PipeHeader, field: PipeField) -> usize {
    header.get_count(field).max(0) as usize
}
