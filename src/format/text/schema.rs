//! Column-role inference for sparse text grids (first pass).

use crate::error::{IoError, TextError};
use crate::grid::ElementKind;

/// Most data columns a row may carry (one octonion).
pub const MAX_DATA_COLUMNS: usize = 8;

/// What the first pass learned about a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSchema {
    /// Columns per row, fixed by the first row
    pub column_count: usize,
    /// Leading integer coordinate columns
    pub coordinate_columns: usize,
    /// Smallest value seen in each coordinate column
    pub min: Vec<i64>,
    /// Largest value seen in each coordinate column
    pub max: Vec<i64>,
    /// Non-blank rows read
    pub rows: usize,
}

impl TextSchema {
    pub fn data_columns(&self) -> usize {
        self.column_count - self.coordinate_columns
    }

    /// Element kind selected by the number of data columns.
    pub fn element_kind(&self) -> Result<ElementKind, TextError> {
        let columns = self.data_columns();
        ElementKind::for_component_count(columns)
            .ok_or(TextError::UnsupportedComponentCount(columns))
    }

    /// Grid extents: `max - min + 1` per coordinate column.
    pub fn extents(&self) -> Result<Vec<usize>, TextError> {
        self.min
            .iter()
            .zip(&self.max)
            .enumerate()
            .map(|(column, (&lo, &hi))| {
                hi.checked_sub(lo)
                    .and_then(|span| usize::try_from(span).ok())
                    .and_then(|span| span.checked_add(1))
                    .ok_or(TextError::CoordinateOverflow { column })
            })
            .collect()
    }
}

/// Split a line into tokens, or `None` if it is blank.
pub(crate) fn tokens(line: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Infer column roles and the coordinate bounding box.
///
/// The first row fixes the column count. A column is a coordinate column
/// only if every row holds an integer there; the coordinate columns are the
/// leading run of such columns and everything after them is data. Passing
/// `coordinate_columns` skips the inference but still requires those columns
/// to be integral. Row order never affects the result.
///
/// # Errors
/// - `ColumnCountMismatch` if a row disagrees with the first row
/// - `MalformedRow` for a non-numeric token, or a non-integer in a forced
///   coordinate column
/// - `NoDimensionColumns` / `NoDataColumns` if either role ends up empty
/// - `UnsupportedComponentCount` for more than eight data columns
pub fn infer_schema<I>(lines: I, coordinate_columns: Option<usize>) -> Result<TextSchema, TextError>
where
    I: IntoIterator<Item = Result<String, IoError>>,
{
    let mut column_count = 0;
    let mut integral: Vec<bool> = Vec::new();
    let mut min: Vec<i64> = Vec::new();
    let mut max: Vec<i64> = Vec::new();
    let mut rows = 0;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let Some(tokens) = tokens(&line) else {
            continue;
        };

        if rows == 0 {
            column_count = tokens.len();
            integral = vec![true; column_count];
            min = vec![i64::MAX; column_count];
            max = vec![i64::MIN; column_count];
        } else if tokens.len() != column_count {
            return Err(TextError::ColumnCountMismatch {
                line: line_number,
                expected: column_count,
                actual: tokens.len(),
            });
        }
        rows += 1;

        for (column, token) in tokens.iter().enumerate() {
            match token.parse::<i64>() {
                Ok(value) => {
                    min[column] = min[column].min(value);
                    max[column] = max[column].max(value);
                }
                Err(_) => {
                    if token.parse::<f64>().is_err() {
                        return Err(TextError::MalformedRow {
                            line: line_number,
                            message: format!("'{}' in column {} is not a number", token, column + 1),
                        });
                    }
                    if coordinate_columns.map_or(false, |k| column < k) {
                        return Err(TextError::MalformedRow {
                            line: line_number,
                            message: format!(
                                "'{}' in coordinate column {} is not an integer",
                                token,
                                column + 1
                            ),
                        });
                    }
                    integral[column] = false;
                }
            }
        }
    }

    if rows == 0 {
        return Err(TextError::NoDimensionColumns);
    }

    let coordinates = match coordinate_columns {
        Some(k) => k.min(column_count),
        None => integral.iter().take_while(|&&is_int| is_int).count(),
    };
    if coordinates == 0 {
        return Err(TextError::NoDimensionColumns);
    }
    let data = column_count - coordinates;
    if data == 0 {
        return Err(TextError::NoDataColumns);
    }
    if data > MAX_DATA_COLUMNS {
        return Err(TextError::UnsupportedComponentCount(data));
    }

    min.truncate(coordinates);
    max.truncate(coordinates);

    Ok(TextSchema {
        column_count,
        coordinate_columns: coordinates,
        min,
        max,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<Result<String, IoError>> {
        text.lines().map(|l| Ok(l.to_string())).collect()
    }

    #[test]
    fn test_infers_leading_integer_columns() {
        let schema = infer_schema(lines("1 5 0.5 1.5\n3 2 2.0 -1\n2 4 7 8.25\n"), None).unwrap();
        assert_eq!(schema.column_count, 4);
        assert_eq!(schema.coordinate_columns, 2);
        assert_eq!(schema.data_columns(), 2);
        assert_eq!(schema.min, vec![1, 2]);
        assert_eq!(schema.max, vec![3, 5]);
        assert_eq!(schema.extents().unwrap(), vec![3, 4]);
        assert_eq!(schema.element_kind().unwrap(), ElementKind::Complex);
        assert_eq!(schema.rows, 3);
    }

    #[test]
    fn test_integral_data_column_after_real_one() {
        // Column 3 is integral everywhere but follows a real column
        let schema = infer_schema(lines("0 1.5 3\n1 2.5 4\n"), None).unwrap();
        assert_eq!(schema.coordinate_columns, 1);
        assert_eq!(schema.data_columns(), 2);
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let rows = ["4 -2 1.5", "1 0 2.5", "2 3 0.25", "-1 1 9.5"];
        let forward = infer_schema(lines(&rows.join("\n")), None).unwrap();
        let mut reversed = rows.to_vec();
        reversed.reverse();
        let backward = infer_schema(lines(&reversed.join("\n")), None).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.extents().unwrap(), vec![6, 6]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let schema = infer_schema(lines("\n0 0 1.5\n\n   \n1 1 2.5\n"), None).unwrap();
        assert_eq!(schema.rows, 2);
    }

    #[test]
    fn test_schema_failures() {
        assert!(matches!(
            infer_schema(lines(""), None),
            Err(TextError::NoDimensionColumns)
        ));
        assert!(matches!(
            infer_schema(lines("0.5 1.5\n"), None),
            Err(TextError::NoDimensionColumns)
        ));
        assert!(matches!(
            infer_schema(lines("1 2 3\n4 5 6\n"), None),
            Err(TextError::NoDataColumns)
        ));
        assert!(matches!(
            infer_schema(lines("0 1 2 3 4 5 6 7 8 9.5\n"), Some(1)),
            Err(TextError::UnsupportedComponentCount(9))
        ));
    }

    #[test]
    fn test_malformed_rows() {
        assert!(matches!(
            infer_schema(lines("0 1.5\n1 abc\n"), None),
            Err(TextError::MalformedRow { line: 2, .. })
        ));
        assert!(matches!(
            infer_schema(lines("0 1.5\n1 2.5 3.5\n"), None),
            Err(TextError::ColumnCountMismatch {
                line: 2,
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_coordinate_override() {
        let schema = infer_schema(lines("1 2 3\n4 5 6\n"), Some(2)).unwrap();
        assert_eq!(schema.coordinate_columns, 2);
        assert_eq!(schema.element_kind().unwrap(), ElementKind::Real);

        assert!(matches!(
            infer_schema(lines("1 2.5 3\n"), Some(2)),
            Err(TextError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn test_io_error_propagates() {
        let input = vec![Ok("0 1.5".to_string()), Err(IoError::Read("boom".into()))];
        assert!(matches!(infer_schema(input, None), Err(TextError::Io(_))));
    }
}
