use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::Result;

/// Writes the table as CSV with a header row; nulls are left empty.
pub fn write_table(path: &Path, table: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(table)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use polars::prelude::Column;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn writes_header_and_leaves_nulls_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let mut table = DataFrame::new(vec![
            Column::new("patient_id".into(), vec![Some("FG"), None]),
            Column::new("time_seconds".into(), vec![Some(10i64), Some(20)]),
        ])
        .unwrap();

        write_table(&path, &mut table).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "patient_id,time_seconds\nFG,10\n,20\n"
        );
    }
}
