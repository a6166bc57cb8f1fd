//! Cleaning pipeline for the multi-sheet CPET workbook.
//!
//! Every registered sheet is loaded as text, normalized, stripped of sparse
//! rows, tagged with its patient identifier and elapsed seconds, coerced to
//! numeric types where possible and renamed to canonical column names. The
//! per-sheet tables are then stacked in workbook order.

pub mod registry;
pub mod transform;

use std::io::{Read, Seek};
use std::path::Path;

use calamine::Sheets;
use polars::prelude::{Column, DataFrame};
use tracing::{debug, info, warn};

use crate::error::{Result, ToolError};
use crate::frame::stack_frames;
use crate::io::excel_read;
use registry::{
    MIN_PRESENT_CELLS, PATIENT_COLUMN, TIME_COLUMN, TIME_SECONDS_COLUMN, skip_rows_for,
};
use transform::{
    convert_time_to_seconds, correct_dtypes, describe_cell, drop_sparse_rows, normalize_columns,
    rename_columns,
};

/// Sheets accepted and skipped during one cleaning run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    /// Processed sheets with the number of rows each contributed.
    pub processed_sheets: Vec<(String, usize)>,
    /// Sheets without a skip-row entry, in workbook order.
    pub skipped_sheets: Vec<String>,
}

/// Result of cleaning a workbook.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub table: DataFrame,
    pub report: CleaningReport,
}

/// Loads the workbook at `path` and cleans every registered sheet.
pub fn load_and_process_excel(path: &Path) -> Result<CleanedDataset> {
    let mut workbook = excel_read::open(path)?;
    process_workbook(&mut workbook)
}

/// Cleans every registered sheet of an already opened workbook.
pub fn process_workbook<R: Read + Seek>(workbook: &mut Sheets<R>) -> Result<CleanedDataset> {
    let mut tables = Vec::new();
    let mut report = CleaningReport::default();

    for sheet in excel_read::sheet_names(workbook) {
        info!(sheet = %sheet, "processing sheet");
        let Some(skip_rows) = skip_rows_for(&sheet) else {
            warn!(sheet = %sheet, "no skip row defined for sheet, skipping it");
            report.skipped_sheets.push(sheet);
            continue;
        };
        debug!(sheet = %sheet, skip_rows, "resolved skip rows");

        let raw = excel_read::read_sheet(workbook, &sheet, skip_rows)?;
        let table = clean_sheet(raw, &sheet)?;
        report.processed_sheets.push((sheet, table.height()));
        tables.push(table);
    }

    if tables.is_empty() {
        return Err(ToolError::NoSheetsProcessed);
    }

    info!(sheet_count = tables.len(), "processed sheets from the workbook");
    let table = stack_frames(tables)?;
    Ok(CleanedDataset { table, report })
}

/// Runs the per-sheet transformations on a raw text frame.
pub fn clean_sheet(raw: DataFrame, sheet: &str) -> Result<DataFrame> {
    let mut table = drop_sparse_rows(&normalize_columns(raw)?, MIN_PRESENT_CELLS)?;
    debug!(sheet, rows = table.height(), "kept measurement rows");

    let seconds = time_in_seconds(&table, sheet)?;
    let patient = vec![sheet; table.height()];

    table.with_column(Column::new(PATIENT_COLUMN.into(), patient))?;
    table.with_column(Column::new(TIME_SECONDS_COLUMN.into(), seconds))?;
    table.drop_in_place(TIME_COLUMN)?;

    rename_columns(correct_dtypes(table)?)
}

fn time_in_seconds(table: &DataFrame, sheet: &str) -> Result<Vec<i64>> {
    let column = table.column(TIME_COLUMN).map_err(|_| {
        ToolError::InvalidWorkbook(format!("sheet '{sheet}' has no '{TIME_COLUMN}' column"))
    })?;

    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            convert_time_to_seconds(cell).map_err(|_| ToolError::InvalidTime {
                sheet: sheet.to_string(),
                row,
                value: describe_cell(cell),
            })
        })
        .collect()
}
