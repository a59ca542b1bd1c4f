use std::io::Read;

use tracing::debug;

use crate::dataset::{Dataset, GridData, Samples};
use crate::error::{GridError, IoError, UcsfError};
use crate::grid::{CoordWalker, DenseGrid, Element, ElementKind, WalkOrder};
use crate::io::{read_f32_be, read_full, read_prefix, DataSource};

use super::header::{UcsfHeader, AXIS_HEADER_SIZE, PREAMBLE_SIZE};

/// Decode a UCSF file.
///
/// Returns `Ok(None)` if the source does not carry the UCSF signature, so a
/// caller can move on to another decoder. Every other problem is an error.
pub fn read_ucsf<S>(source: &S) -> Result<Option<Dataset>, UcsfError>
where
    S: DataSource + ?Sized,
{
    let mut reader = source.open()?;

    let preamble = read_prefix(&mut *reader, PREAMBLE_SIZE)?;
    if !super::header::is_ucsf_magic(&preamble) {
        debug!(source = source.identifier(), "Not a UCSF file");
        return Ok(None);
    }
    if preamble.len() < PREAMBLE_SIZE {
        return Err(UcsfError::TooSmall {
            required: PREAMBLE_SIZE as u64,
            actual: preamble.len() as u64,
        });
    }

    let dims = preamble[10] as usize;
    let mut header_bytes = preamble;
    if (1..=4).contains(&dims) {
        let axis_bytes = read_prefix(&mut *reader, dims * AXIS_HEADER_SIZE)?;
        header_bytes.extend_from_slice(&axis_bytes);
    }
    let header = match UcsfHeader::parse(&header_bytes) {
        Ok(header) => header,
        Err(UcsfError::BadMagic) => return Ok(None),
        Err(e) => return Err(e),
    };

    let expected = header.payload_size().unwrap_or(u64::MAX);
    let available = source.size().saturating_sub(header.header_size() as u64);
    if available < expected {
        return Err(UcsfError::SizeMismatch {
            expected,
            actual: available,
        });
    }

    let data = match header.element_kind()? {
        ElementKind::Real => GridData::Real(decode_tiles(&header, &mut *reader)?),
        ElementKind::Complex => GridData::Complex(decode_tiles(&header, &mut *reader)?),
        ElementKind::Quaternion => GridData::Quaternion(decode_tiles(&header, &mut *reader)?),
        ElementKind::Octonion => GridData::Octonion(decode_tiles(&header, &mut *reader)?),
    };

    debug!(
        source = source.identifier(),
        kind = %data.kind(),
        extents = ?data.extents(),
        "Decoded UCSF file"
    );

    Ok(Some(Dataset::new(
        source.identifier(),
        Samples::Single(data),
        header.axis_summaries(),
        header.provenance(),
    )))
}

/// Read every tile from `reader` and scatter it into a dense grid.
///
/// Tiles, and points within a tile, are stored with stored axis 0 slowest.
/// Stored axis `i` lands on output axis `d - 1 - i`, and output axis 1 is
/// mirrored. Padding points past an axis' point count are consumed from the
/// stream but never written.
pub fn decode_tiles<E>(header: &UcsfHeader, reader: &mut dyn Read) -> Result<DenseGrid<E>, UcsfError>
where
    E: Element<Scalar = f32>,
{
    let dims = header.dim_count();
    let extents = header.output_extents();
    let mut grid = DenseGrid::<E>::allocate(&extents)?;

    let points: Vec<usize> = header.axes.iter().map(|a| a.points).collect();
    let tile_sizes: Vec<usize> = header.axes.iter().map(|a| a.tile_size).collect();
    let tile_counts: Vec<usize> = header.axes.iter().map(|a| a.tile_count()).collect();
    let components = header.component_count as usize;

    let tile_floats = header.tile_floats().ok_or(GridError::Overflow)?;
    let tile_bytes = tile_floats.checked_mul(4).ok_or(GridError::Overflow)?;
    let tile_points = tile_floats / components;
    let mut block = vec![0u8; tile_bytes];
    let mut values = vec![0f32; components];
    let mut stored = vec![0usize; dims];
    let mut output = vec![0usize; dims];

    for (tiles_read, tile) in CoordWalker::with_order(&tile_counts, WalkOrder::LastFastest).enumerate() {
        read_full(reader, &mut block).map_err(|e| short_tile(e, tiles_read, block.len()))?;

        for point in 0..tile_points {
            // In-tile offset of `point`, last stored axis fastest
            let mut rest = point;
            for axis in (0..dims).rev() {
                stored[axis] = tile[axis] * tile_sizes[axis] + rest % tile_sizes[axis];
                rest /= tile_sizes[axis];
            }
            if stored.iter().zip(&points).any(|(s, p)| s >= p) {
                continue;
            }

            for axis in 0..dims {
                output[dims - 1 - axis] = stored[axis];
            }
            if dims >= 2 {
                output[1] = extents[1] - output[1] - 1;
            }

            let start = point * components * 4;
            for (c, value) in values.iter_mut().enumerate() {
                let at = start + c * 4;
                *value = read_f32_be(&block[at..at + 4]);
            }
            grid.set(&output, E::from_components(&values))?;
        }
    }

    Ok(grid)
}

/// Restate a short tile read in terms of the whole payload.
fn short_tile(err: IoError, tiles_read: usize, tile_bytes: usize) -> IoError {
    match err {
        IoError::ShortRead { actual, .. } => IoError::ShortRead {
            expected: ((tiles_read + 1) * tile_bytes) as u64,
            actual: (tiles_read * tile_bytes) as u64 + actual,
        },
        other => other,
    }
}
