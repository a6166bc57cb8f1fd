//! Column-level transformations applied to every patient sheet.

use polars::prelude::{Column, DataFrame, DataType};

use crate::cleaning::registry::canonical_name;
use crate::error::{Result, ToolError};
use crate::frame::{filter_rows, present_counts, rename_all};

/// Trims, lowercases and replaces spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

pub fn normalize_columns(table: DataFrame) -> Result<DataFrame> {
    rename_all(table, normalize_column_name)
}

/// Maps normalized names to canonical ones; unknown names pass through.
pub fn rename_columns(table: DataFrame) -> Result<DataFrame> {
    rename_all(table, |name| canonical_name(name).unwrap_or(name).to_string())
}

/// Drops rows holding fewer than `min_present` non-null cells.
pub fn drop_sparse_rows(table: &DataFrame, min_present: usize) -> Result<DataFrame> {
    let keep: Vec<bool> = present_counts(table)
        .into_iter()
        .map(|present| present >= min_present)
        .collect();
    filter_rows(table, &keep)
}

/// Converts an `HH:MM:SS` string into a number of seconds.
///
/// A missing cell, or text that is not three unsigned integers separated by
/// colons, is rejected.
pub fn convert_time_to_seconds(value: Option<&str>) -> Result<i64> {
    let invalid = || ToolError::TimeFormat(describe_cell(value));
    let text = value.ok_or_else(invalid)?;

    let parts: Vec<&str> = text.split(':').collect();
    let [hours, minutes, seconds] = parts[..] else {
        return Err(invalid());
    };

    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map(i64::from)
            .map_err(|_| invalid())
    };

    Ok(parse(hours)? * 3600 + parse(minutes)? * 60 + parse(seconds)?)
}

/// Renders a text cell for error messages.
pub fn describe_cell(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("'{text}'"),
        None => "<missing>".to_string(),
    }
}

/// Strips text columns and turns them numeric when at least one value parses.
///
/// Values that fail to parse in a converted column become null. Columns
/// where nothing parses stay text.
pub fn correct_dtypes(table: DataFrame) -> Result<DataFrame> {
    let columns = table
        .get_columns()
        .iter()
        .map(|column| match column.dtype() {
            DataType::String => coerce_text_column(column),
            _ => Ok(column.clone()),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn coerce_text_column(column: &Column) -> Result<Column> {
    let name = column.name().clone();
    let cells: Vec<Option<String>> = column
        .str()?
        .into_iter()
        .map(|cell| cell.map(|value| value.trim().to_string()))
        .collect();
    let integral = cells
        .iter()
        .all(|cell| cell.as_deref().is_some_and(|value| value.parse::<i64>().is_ok()));
    let stripped = Column::new(name.clone(), cells);

    let numbers: Vec<Option<f64>> = stripped
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|number| number.filter(|number| !number.is_nan()))
        .collect();

    if numbers.iter().all(Option::is_none) {
        return Ok(stripped);
    }
    if integral {
        return Ok(stripped.cast(&DataType::Int64)?);
    }
    Ok(Column::new(name, numbers))
}

#[cfg(test)]
mod tests {
    use polars::prelude::AnyValue;

    use super::*;
    use crate::frame::column_names;

    fn table(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name.into(), values.to_vec())
    }

    fn cell<'a>(table: &'a DataFrame, column: &str, row: usize) -> AnyValue<'a> {
        table.column(column).unwrap().get(row).unwrap()
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_column_name("  VO2 (mL/min) "), "vo2_(ml/min)");
        assert_eq!(normalize_column_name("RR (br/min) copy"), "rr_(br/min)_copy");
        assert_eq!(normalize_column_name(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["Time (min)", "  Mixed Case  Name ", "already_normal", "\tTab Lead", "A  B"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn converts_time_strings() {
        assert_eq!(convert_time_to_seconds(Some("01:02:03")).unwrap(), 3723);
        assert_eq!(convert_time_to_seconds(Some("00:00:00")).unwrap(), 0);
        assert_eq!(convert_time_to_seconds(Some("0:10:05")).unwrap(), 605);
        assert_eq!(convert_time_to_seconds(Some("26:00:00")).unwrap(), 93_600);
    }

    #[test]
    fn rejects_missing_time_values() {
        match convert_time_to_seconds(None) {
            Err(ToolError::TimeFormat(value)) => assert_eq!(value, "<missing>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_time_strings() {
        for raw in ["", "12:30", "1:2:3:4", "aa:bb:cc", "-1:00:00", "01:02:3.5", "0.0625"] {
            assert!(
                matches!(convert_time_to_seconds(Some(raw)), Err(ToolError::TimeFormat(_))),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn partially_numeric_column_becomes_numeric_with_nulls() {
        let corrected = correct_dtypes(table(vec![text_column("a", &["1", "2", "abc"])])).unwrap();

        assert_eq!(corrected.column("a").unwrap().dtype(), &DataType::Float64);
        assert_eq!(cell(&corrected, "a", 1), AnyValue::Float64(2.0));
        assert_eq!(cell(&corrected, "a", 2), AnyValue::Null);
    }

    #[test]
    fn unparsable_column_stays_text_and_is_stripped() {
        let corrected = correct_dtypes(table(vec![text_column("a", &[" x", "y ", "z"])])).unwrap();

        assert_eq!(corrected.column("a").unwrap().dtype(), &DataType::String);
        assert_eq!(cell(&corrected, "a", 0), AnyValue::String("x"));
        assert_eq!(cell(&corrected, "a", 1), AnyValue::String("y"));
    }

    #[test]
    fn fully_integer_column_becomes_integer() {
        let corrected =
            correct_dtypes(table(vec![text_column("a", &[" 10", "20 ", "30"])])).unwrap();

        assert_eq!(corrected.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(cell(&corrected, "a", 0), AnyValue::Int64(10));
    }

    #[test]
    fn nulls_force_float_storage() {
        let corrected = correct_dtypes(table(vec![Column::new(
            "a".into(),
            vec![Some("1"), None, Some("1.25")],
        )]))
        .unwrap();

        assert_eq!(corrected.column("a").unwrap().dtype(), &DataType::Float64);
        assert_eq!(cell(&corrected, "a", 1), AnyValue::Null);
        assert_eq!(cell(&corrected, "a", 2), AnyValue::Float64(1.25));
    }

    #[test]
    fn rename_applies_to_exact_matches_only() {
        let renamed = rename_columns(table(vec![
            text_column("vo2_(ml/min)", &["1"]),
            text_column("VO2_(ml/min)", &["2"]),
            text_column("rr_(br/min)_copy", &["3"]),
        ]))
        .unwrap();

        assert_eq!(
            column_names(&renamed),
            vec!["vo2_ml_per_min", "VO2_(ml/min)", "rr_(br/min)_copy"]
        );
    }

    #[test]
    fn sparse_rows_are_dropped() {
        let kept = drop_sparse_rows(
            &table(vec![
                Column::new("a".into(), vec![Some("1"), None]),
                Column::new("b".into(), vec![Some("2"), Some("x")]),
            ]),
            2,
        )
        .unwrap();

        assert_eq!(kept.height(), 1);
        assert_eq!(cell(&kept, "b", 0), AnyValue::String("2"));
    }
}
