//! Small helpers over polars data frames shared by the cleaning pipeline and
//! the table writers.

use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, DataType, NewChunkedArray};

use crate::error::Result;

/// Builds a frame of string columns from `(name, cells)` pairs.
pub fn text_frame<S: AsRef<str>>(
    columns: impl IntoIterator<Item = (S, Vec<Option<String>>)>,
) -> Result<DataFrame> {
    let columns = columns
        .into_iter()
        .map(|(name, cells)| Column::new(name.as_ref().into(), cells))
        .collect();
    Ok(DataFrame::new(columns)?)
}

pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Renames every column through `rename`, keeping the column order.
pub fn rename_all(mut frame: DataFrame, rename: impl Fn(&str) -> String) -> Result<DataFrame> {
    for old in column_names(&frame) {
        let new = rename(&old);
        if new != old {
            frame.rename(&old, new.into())?;
        }
    }
    Ok(frame)
}

/// Number of non-null cells in every row.
pub fn present_counts(frame: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0; frame.height()];
    for column in frame.get_columns() {
        let present = column.as_materialized_series().is_not_null();
        for (count, present) in counts.iter_mut().zip(&present) {
            if present.unwrap_or(false) {
                *count += 1;
            }
        }
    }
    counts
}

/// Keeps the rows where `keep` is true.
pub fn filter_rows(frame: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(frame.filter(&mask)?)
}

/// Stacks `frames` vertically in order.
///
/// Columns are unioned in first-seen order and null-filled where a frame
/// lacks them. A column that is integer in one frame and float in another
/// becomes float; any other disagreement falls back to text.
pub fn stack_frames(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut names: Vec<String> = Vec::new();
    let mut dtypes: Vec<DataType> = Vec::new();
    for frame in &frames {
        for column in frame.get_columns() {
            let name = column.name().as_str();
            match names.iter().position(|known| known == name) {
                Some(idx) => dtypes[idx] = widen(&dtypes[idx], column.dtype()),
                None => {
                    names.push(name.to_string());
                    dtypes.push(column.dtype().clone());
                }
            }
        }
    }

    let mut aligned = frames
        .into_iter()
        .map(|frame| align(&frame, &names, &dtypes));
    let Some(first) = aligned.next() else {
        return Ok(DataFrame::empty());
    };
    let mut stacked = first?;
    for frame in aligned {
        stacked.vstack_mut(&frame?)?;
    }
    Ok(stacked)
}

fn align(frame: &DataFrame, names: &[String], dtypes: &[DataType]) -> Result<DataFrame> {
    let height = frame.height();
    let columns = names
        .iter()
        .zip(dtypes)
        .map(|(name, dtype)| match frame.column(name) {
            Ok(column) => column.cast(dtype),
            Err(_) => Ok(Column::full_null(name.as_str().into(), height, dtype)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(DataFrame::new(columns)?)
}

fn widen(current: &DataType, next: &DataType) -> DataType {
    match (current, next) {
        (lhs, rhs) if lhs == rhs => lhs.clone(),
        (DataType::Int64 | DataType::Float64, DataType::Int64 | DataType::Float64) => {
            DataType::Float64
        }
        _ => DataType::String,
    }
}

/// Renders a cell as text; nulls yield `None`.
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(text) => Some(text.to_string()),
        AnyValue::StringOwned(text) => Some(text.to_string()),
        AnyValue::Int64(number) => Some(number.to_string()),
        AnyValue::Float64(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn stacking_unions_columns_and_fills_nulls() {
        let first = frame(vec![
            Column::new("a".into(), vec![Some(1i64), Some(2)]),
            Column::new("b".into(), vec![Some("x"), Some("y")]),
        ]);
        let second = frame(vec![Column::new("c".into(), vec![Some(0.5f64)])]);

        let stacked = stack_frames(vec![first, second]).unwrap();

        assert_eq!(column_names(&stacked), vec!["a", "b", "c"]);
        assert_eq!(stacked.height(), 3);
        assert_eq!(stacked.column("a").unwrap().get(2).unwrap(), AnyValue::Null);
        assert_eq!(stacked.column("c").unwrap().get(0).unwrap(), AnyValue::Null);
        assert_eq!(
            stacked.column("c").unwrap().get(2).unwrap(),
            AnyValue::Float64(0.5)
        );
    }

    #[test]
    fn stacking_widens_mismatched_types() {
        let integers = frame(vec![Column::new("a".into(), vec![Some(1i64)])]);
        let floats = frame(vec![Column::new("a".into(), vec![Some(2.5f64)])]);
        let text = frame(vec![Column::new("a".into(), vec![Some("n/a")])]);

        let numeric = stack_frames(vec![integers.clone(), floats]).unwrap();
        assert_eq!(numeric.column("a").unwrap().dtype(), &DataType::Float64);
        assert_eq!(numeric.column("a").unwrap().get(0).unwrap(), AnyValue::Float64(1.0));

        let mixed = stack_frames(vec![integers, text]).unwrap();
        assert_eq!(mixed.column("a").unwrap().dtype(), &DataType::String);
        assert_eq!(cell_text(mixed.column("a").unwrap().get(0).unwrap()), Some("1".into()));
        assert_eq!(cell_text(mixed.column("a").unwrap().get(1).unwrap()), Some("n/a".into()));
    }

    #[test]
    fn present_counts_ignore_nulls() {
        let table = frame(vec![
            Column::new("a".into(), vec![Some("1"), None, Some("3")]),
            Column::new("b".into(), vec![Some("x"), None, None]),
        ]);

        assert_eq!(present_counts(&table), vec![2, 0, 1]);

        let kept = filter_rows(&table, &[true, false, true]).unwrap();
        assert_eq!(kept.height(), 2);
        assert_eq!(cell_text(kept.column("a").unwrap().get(1).unwrap()), Some("3".into()));
    }

    #[test]
    fn renaming_keeps_order() {
        let table = frame(vec![
            Column::new("A".into(), vec![Some("1")]),
            Column::new("b".into(), vec![Some("2")]),
        ]);

        let renamed = rename_all(table, |name| name.to_lowercase()).unwrap();

        assert_eq!(column_names(&renamed), vec!["a", "b"]);
    }
}
