use std::io::Read;

use tracing::debug;

use crate::dataset::{Dataset, Samples};
use crate::error::{IoError, PipeError};
use crate::io::{read_full, ByteOrder, DataSource};

use super::assemble::{assemble_layout, PipeLayout};
use super::fields::HEADER_SIZE;
use super::header::PipeHeader;

/// Floats decoded per read call while streaming the payload.
const CHUNK_FLOATS: usize = 16 * 1024;

/// Decode an NMRPipe file into a single-precision dataset.
///
/// The file length is checked before anything is read: it must hold the
/// 2048-byte header plus a whole number of 4-byte floats. The header and
/// layout are validated before the payload is touched, so a bad header never
/// costs a full read.
pub fn read_pipe<S>(source: &S) -> Result<Dataset, PipeError>
where
    S: DataSource + ?Sized,
{
    let length = source.size();
    if length < HEADER_SIZE as u64 {
        return Err(PipeError::TooSmall {
            required: HEADER_SIZE as u64,
            actual: length,
        });
    }
    if (length - HEADER_SIZE as u64) % 4 != 0 {
        return Err(PipeError::MisalignedLength { length });
    }
    let float_count = (length - HEADER_SIZE as u64) / 4;

    let mut reader = source.open()?;

    let mut header_bytes = vec![0u8; HEADER_SIZE];
    read_full(&mut *reader, &mut header_bytes)?;
    let header = PipeHeader::parse(&header_bytes)?;

    let layout = PipeLayout::from_header(&header, float_count)?;
    let count = usize::try_from(float_count)
        .map_err(|_| IoError::Read(format!("{}: payload too large", source.identifier())))?;
    let floats = read_floats(&mut *reader, count, header.byte_order())?;

    let data = assemble_layout(&layout, &floats)?;

    let axes = header
        .axis_descriptors()?
        .iter()
        .zip(&layout.extents)
        .map(|(descriptor, &size)| descriptor.summary(size))
        .collect();

    let mut provenance = header.provenance()?;
    provenance.insert_text("byte order", header.byte_order().name());

    debug!(
        source = source.identifier(),
        kind = %layout.kind,
        extents = ?layout.extents,
        "Decoded NMRPipe file"
    );

    Ok(Dataset::new(
        source.identifier(),
        Samples::Single(data),
        axes,
        provenance,
    ))
}

/// Read `count` floats in `order`, correcting each to native values.
fn read_floats(reader: &mut dyn Read, count: usize, order: ByteOrder) -> Result<Vec<f32>, IoError> {
    let mut floats = Vec::with_capacity(count);
    let mut buf = vec![0u8; CHUNK_FLOATS.min(count.max(1)) * 4];

    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(CHUNK_FLOATS);
        let bytes = &mut buf[..n * 4];
        read_full(reader, bytes).map_err(|e| match e {
            IoError::ShortRead { .. } => IoError::ShortRead {
                expected: (count * 4) as u64,
                actual: ((count - remaining) * 4) as u64,
            },
            other => other,
        })?;
        floats.extend(bytes.chunks_exact(4).map(|word| order.read_f32(word)));
        remaining -= n;
    }
    Ok(floats)
}
