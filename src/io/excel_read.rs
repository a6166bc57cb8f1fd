use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{DataType, Range, Reader, Sheets, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::DataFrame;

use crate::cleaning::registry::{SHEET_HEADER, SHEET_WIDTH};
use crate::error::{Result, ToolError};
use crate::frame::text_frame;

/// Text tokens read as missing cells.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Opens any workbook format supported by calamine.
pub fn open(path: &Path) -> Result<Sheets<BufReader<File>>> {
    Ok(open_workbook_auto(path)?)
}

/// Returns the sheet names in workbook order.
pub fn sheet_names<R: Read + Seek>(workbook: &Sheets<R>) -> Vec<String> {
    workbook.sheet_names().to_vec()
}

/// Reads columns A:W of `sheet` as text, labelled with the fixed sheet header.
///
/// The first `skip_rows` rows are discarded and the following row, the
/// sheet's own header line, is replaced by [`SHEET_HEADER`].
pub fn read_sheet<R: Read + Seek>(
    workbook: &mut Sheets<R>,
    sheet: &str,
    skip_rows: u32,
) -> Result<DataFrame> {
    let range = workbook
        .worksheet_range(sheet)
        .ok_or_else(|| ToolError::MissingSheet(sheet.to_string()))??;
    read_fixed_range(&range, skip_rows + 1)
}

/// Reads the `SHEET_WIDTH` leftmost columns from `first_row` to the end of
/// the used range. Positions are absolute sheet coordinates.
pub fn read_fixed_range(range: &Range<DataType>, first_row: u32) -> Result<DataFrame> {
    let last_row = range.end().map(|(row, _)| row);

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); SHEET_WIDTH];
    if let Some(last_row) = last_row {
        for row in first_row..=last_row {
            for (col, cells) in columns.iter_mut().enumerate() {
                let cell = range.get_value((row, col as u32));
                cells.push(cell_to_text(cell));
            }
        }
    }

    text_frame(SHEET_HEADER.into_iter().zip(columns))
}

/// Renders a cell as opaque text; empty cells and missing tokens yield `None`.
pub fn cell_to_text(cell: Option<&DataType>) -> Option<String> {
    let text = match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::DateTime(serial)) => serial_to_text(*serial)?,
        Some(DataType::Duration(days)) => clock_to_text(*days),
        Some(DataType::DateTimeIso(value)) => iso_datetime_to_text(value),
        Some(DataType::DurationIso(value)) => {
            iso_duration_to_text(value).unwrap_or_else(|| value.clone())
        }
        Some(DataType::Empty) | None => return None,
        Some(other) => other.to_string(),
    };

    if MISSING_TOKENS.contains(&text.as_str()) {
        None
    } else {
        Some(text)
    }
}

/// Excel serial date: whole days since 1899-12-30, fraction is the time of day.
/// Values below one day hold a bare time and are rendered as `HH:MM:SS`.
fn serial_to_text(serial: f64) -> Option<String> {
    if (0.0..1.0).contains(&serial) {
        return Some(clock_to_text(serial));
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::seconds(seconds))?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Elapsed time as `HH:MM:SS`; hours are not wrapped at 24.
fn clock_to_text(days: f64) -> String {
    let total = (days * SECONDS_PER_DAY).round().max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn iso_datetime_to_text(value: &str) -> String {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S%.f") {
        return time.format("%H:%M:%S").to_string();
    }
    value.to_string()
}

/// Parses `PT#H#M#S` durations as written by OpenDocument spreadsheets.
fn iso_duration_to_text(value: &str) -> Option<String> {
    let mut rest = value.strip_prefix("PT")?;
    let mut seconds = 0.0;
    for (unit, scale) in [('H', 3600.0), ('M', 60.0), ('S', 1.0)] {
        if let Some((amount, tail)) = rest.split_once(unit) {
            seconds += amount.parse::<f64>().ok()? * scale;
            rest = tail;
        }
    }
    if !rest.is_empty() {
        return None;
    }
    Some(clock_to_text(seconds / SECONDS_PER_DAY))
}
