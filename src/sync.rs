use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::cleaning::{self, CleaningReport};
use crate::config::HoursConfig;
use crate::error::{Result, ToolError};
use crate::frame;
use crate::hours;
use crate::io;

/// What the hours command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HoursOutcome {
    /// The report was written with the given number of sessions.
    Report { path: PathBuf, sessions: usize },
    /// The work log was missing; an empty one was created instead.
    PlaceholderCreated(PathBuf),
}

/// Cleans the CPET workbook at `input` and writes the tidy table to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn clean_workbook(input: &Path, output: &Path) -> Result<CleaningReport> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }

    let mut cleaned = cleaning::load_and_process_excel(input)?;
    info!(
        rows = cleaned.table.height(),
        skipped = cleaned.report.skipped_sheets.len(),
        "data cleaned successfully"
    );
    debug!(columns = ?frame::column_names(&cleaned.table), "dataset header");

    ensure_parent(output)?;
    io::write_table(output, &mut cleaned.table)?;
    Ok(cleaned.report)
}

/// Computes hours and costs from the work log and writes the styled report.
///
/// A missing work log is replaced by an empty one and no report is written.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %config.input.display(), output = %config.output.display())
)]
pub fn calculate_hours(config: &HoursConfig) -> Result<HoursOutcome> {
    if !config.input.exists() {
        hours::write_placeholder(&config.input)?;
        warn!(
            path = %config.input.display(),
            "work log not found, created an empty one; fill it in and run again"
        );
        return Ok(HoursOutcome::PlaceholderCreated(config.input.clone()));
    }

    let sessions = hours::read_work_log(&config.input, &config.datetime_format)?;
    info!(session_count = sessions.len(), "read work log");
    let billed = hours::compute(sessions, config.hourly_rate);

    ensure_parent(&config.output)?;
    io::excel_write::write_hours_report(&config.output, &billed)?;
    info!(path = %config.output.display(), "hours report written");

    Ok(HoursOutcome::Report {
        path: config.output.clone(),
        sessions: billed.len(),
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}
