use std::io::{BufRead, BufReader};

use tracing::{debug, warn};

use crate::dataset::{Dataset, GridData, Provenance, Samples};
use crate::error::{IoError, TextError};
use crate::grid::{DenseGrid, Element, ElementKind};
use crate::io::DataSource;

use super::schema::{infer_schema, tokens, TextSchema};

/// Coordinate convention of a text file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFlavor {
    /// Coordinates map straight onto grid coordinates
    #[default]
    Plain,
    /// NMRPipe `pipe2txt` export: origin at the top left, so axis 1 is
    /// mirrored on read
    PipeExport,
}

/// Options for [`read_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    pub flavor: TextFlavor,
    /// Force this many leading coordinate columns instead of inferring them
    pub coordinate_columns: Option<usize>,
}

/// Decode a sparse text grid into a double-precision dataset.
///
/// The source is read twice: once to infer the schema, once to scatter rows
/// into the allocated grid.
pub fn read_text<S>(source: &S, options: &TextOptions) -> Result<Dataset, TextError>
where
    S: DataSource + ?Sized,
{
    let schema = infer_schema(lines(source)?, options.coordinate_columns)?;
    let kind = schema.element_kind()?;

    debug!(
        source = source.identifier(),
        rows = schema.rows,
        coordinates = schema.coordinate_columns,
        kind = %kind,
        min = ?schema.min,
        max = ?schema.max,
        "Inferred text schema"
    );

    let rows = lines(source)?;
    let mut data = match kind {
        ElementKind::Real => GridData::Real(populate(&schema, rows)?),
        ElementKind::Complex => GridData::Complex(populate(&schema, rows)?),
        ElementKind::Quaternion => GridData::Quaternion(populate(&schema, rows)?),
        ElementKind::Octonion => GridData::Octonion(populate(&schema, rows)?),
    };

    if options.flavor == TextFlavor::PipeExport && schema.coordinate_columns >= 2 {
        match &mut data {
            GridData::Real(g) => g.flip_axis(1)?,
            GridData::Complex(g) => g.flip_axis(1)?,
            GridData::Quaternion(g) => g.flip_axis(1)?,
            GridData::Octonion(g) => g.flip_axis(1)?,
        }
    }

    let mut provenance = Provenance::new();
    provenance.insert_number("rows", schema.rows as f64);
    provenance.insert_number("data columns", schema.data_columns() as f64);
    for (index, &origin) in schema.min.iter().enumerate() {
        provenance.insert_number(format!("dim {} origin", index + 1), origin as f64);
    }

    Ok(Dataset::new(
        source.identifier(),
        Samples::Double(data),
        Vec::new(),
        provenance,
    ))
}

/// Scatter every row into a grid sized to the schema's bounding box.
///
/// Components are zero-padded or truncated to the element width. A repeated
/// coordinate keeps the last row written to it.
pub fn populate<E, I>(schema: &TextSchema, lines: I) -> Result<DenseGrid<E>, TextError>
where
    E: Element<Scalar = f64>,
    I: IntoIterator<Item = Result<String, IoError>>,
{
    let extents = schema.extents()?;
    let mut grid = DenseGrid::<E>::allocate(&extents)?;
    let mut written = vec![false; grid.len()];
    let mut duplicates = 0usize;

    let k = schema.coordinate_columns;
    let mut coord = vec![0usize; k];
    let mut values = vec![0f64; schema.data_columns()];

    for (index, line) in lines.into_iter().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let Some(tokens) = tokens(&line) else {
            continue;
        };
        if tokens.len() != schema.column_count {
            return Err(TextError::ColumnCountMismatch {
                line: line_number,
                expected: schema.column_count,
                actual: tokens.len(),
            });
        }

        for (axis, token) in tokens[..k].iter().enumerate() {
            let value: i64 = token.parse().map_err(|_| TextError::MalformedRow {
                line: line_number,
                message: format!("'{}' is not an integer coordinate", token),
            })?;
            coord[axis] = value
                .checked_sub(schema.min[axis])
                .and_then(|offset| usize::try_from(offset).ok())
                .ok_or(TextError::CoordinateOverflow { column: axis })?;
        }
        for (slot, token) in values.iter_mut().zip(&tokens[k..]) {
            *slot = token.parse().map_err(|_| TextError::MalformedRow {
                line: line_number,
                message: format!("'{}' is not a number", token),
            })?;
        }

        let cell = grid.index_of(&coord)?;
        if written[cell] {
            duplicates += 1;
        }
        written[cell] = true;
        grid.as_mut_slice()[cell] = E::from_components(&values);
    }

    if duplicates > 0 {
        warn!(duplicates, "Repeated coordinates in text grid, last row wins");
    }
    Ok(grid)
}

/// Fresh line iterator over the source.
fn lines<S>(source: &S) -> Result<impl Iterator<Item = Result<String, IoError>> + '_, IoError>
where
    S: DataSource + ?Sized,
{
    let reader = BufReader::new(source.open()?);
    let identifier = source.identifier();
    Ok(reader
        .lines()
        .map(move |line| line.map_err(|e| IoError::from_std(e, identifier))))
}
