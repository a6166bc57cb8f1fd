pub mod csv_write;
pub mod excel_read;
pub mod excel_write;

use std::path::Path;

use polars::prelude::DataFrame;

use crate::error::Result;

/// Writes `table` to `path`, as a workbook for `.xlsx` paths and CSV otherwise.
pub fn write_table(path: &Path, table: &mut DataFrame) -> Result<()> {
    let is_workbook = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"));

    if is_workbook {
        excel_write::write_table(path, table)
    } else {
        csv_write::write_table(path, table)
    }
}
