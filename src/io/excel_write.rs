use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, TableColumn, Workbook, Worksheet};

use crate::error::Result;
use crate::frame::{cell_text, column_names};
use crate::hours::BilledSession;

/// Sheet name used for exported cleaned tables.
pub const TABLE_SHEET: &str = "cleaned_data";

const HOURS_FORMAT: &str = "0.00 \"hrs\"";
const COST_FORMAT: &str = "€ #,##0.00";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const HEADER_FILL: u32 = 0x1F4E78;
const SUMMARY_FILL: u32 = 0xD9E1F2;

const HOURS_HEADER: [&str; 5] = ["start", "end", "note", "duration_hrs", "cost_eur"];
const DURATION_COL: u16 = 3;
const COST_COL: u16 = 4;
const SUMMARY_LABEL_COL: u16 = 6;
const TOTAL_HOURS_COL: u16 = 7;
const TOTAL_COST_COL: u16 = 8;
const COLUMN_WIDTHS: [(u16, f64); 7] = [
    (0, 20.0),
    (1, 20.0),
    (2, 15.0),
    (3, 15.0),
    (6, 15.0),
    (7, 15.0),
    (8, 15.0),
];

/// Writes the table to a single-sheet workbook wrapped in an Excel table.
pub fn write_table(path: &Path, table: &DataFrame) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TABLE_SHEET)?;

    let names = column_names(table);
    for (col_idx, name) in names.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, name)?;
    }

    for (col_idx, column) in table.get_columns().iter().enumerate() {
        let col_idx = col_idx as u16;
        for row in 0..table.height() {
            let row_idx = (row + 1) as u32;
            match column.get(row)? {
                AnyValue::Null => {}
                AnyValue::Int64(number) => {
                    worksheet.write_number(row_idx, col_idx, number as f64)?;
                }
                AnyValue::Float64(number) => {
                    worksheet.write_number(row_idx, col_idx, number)?;
                }
                other => {
                    if let Some(text) = cell_text(other) {
                        worksheet.write_string(row_idx, col_idx, &text)?;
                    }
                }
            }
        }
    }

    if table.height() > 0 && !names.is_empty() {
        let columns: Vec<TableColumn> = names
            .iter()
            .map(|name| TableColumn::new().set_header(name))
            .collect();
        let excel_table = rust_xlsxwriter::Table::new()
            .set_autofilter(true)
            .set_columns(&columns);
        let col_end = (names.len() as u16).saturating_sub(1);
        worksheet.add_table(0, 0, table.height() as u32, col_end, &excel_table)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Writes billed sessions as a styled workbook with a side summary in G1:I2.
pub fn write_hours_report(path: &Path, sessions: &[BilledSession]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let border = Format::new().set_border(FormatBorder::Thin);
    let header = border
        .clone()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);
    let datetime = border.clone().set_num_format(DATETIME_FORMAT);
    let hours = border.clone().set_num_format(HOURS_FORMAT);
    let cost = border.clone().set_num_format(COST_FORMAT);

    for (col_idx, name) in HOURS_HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, *name, &header)?;
    }

    for (idx, billed) in sessions.iter().enumerate() {
        let row = (idx + 1) as u32;
        worksheet.write_number_with_format(row, 0, excel_serial(billed.session.start), &datetime)?;
        worksheet.write_number_with_format(row, 1, excel_serial(billed.session.end), &datetime)?;
        worksheet.write_string_with_format(row, 2, &billed.session.note, &border)?;
        worksheet.write_number_with_format(row, DURATION_COL, billed.duration_hrs, &hours)?;
        worksheet.write_number_with_format(row, COST_COL, billed.cost_eur, &cost)?;
    }

    write_summary(worksheet, sessions.len() as u32 + 1, &border, &hours, &cost)?;

    for (col, width) in COLUMN_WIDTHS {
        worksheet.set_column_width(col, width)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_summary(
    worksheet: &mut Worksheet,
    last_row: u32,
    border: &Format,
    hours: &Format,
    cost: &Format,
) -> Result<()> {
    let label = border.clone().set_bold();
    let totals_hours = hours.clone().set_bold().set_background_color(Color::RGB(SUMMARY_FILL));
    let totals_cost = cost.clone().set_bold().set_background_color(Color::RGB(SUMMARY_FILL));
    // Formulas use 1-based rows; an empty log still sums over row 2.
    let last_row = last_row.max(2);

    worksheet.write_blank(0, SUMMARY_LABEL_COL, border)?;
    worksheet.write_string_with_format(0, TOTAL_HOURS_COL, "TOTAL HOURS", &label)?;
    worksheet.write_string_with_format(0, TOTAL_COST_COL, "TOTAL COST", &label)?;
    worksheet.write_string_with_format(1, SUMMARY_LABEL_COL, "TOTAL DUE:", &label)?;
    worksheet.write_formula_with_format(
        1,
        TOTAL_HOURS_COL,
        format!("=SUM(D2:D{last_row})").as_str(),
        &totals_hours,
    )?;
    worksheet.write_formula_with_format(
        1,
        TOTAL_COST_COL,
        format!("=SUM(E2:E{last_row})").as_str(),
        &totals_cost,
    )?;
    Ok(())
}

/// Days since the 1899-12-30 Excel epoch, with the time of day as fraction.
fn excel_serial(datetime: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (datetime - epoch).num_seconds() as f64 / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_matches_known_dates() {
        let noon = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(excel_serial(noon), 45_292.5);
    }
}
