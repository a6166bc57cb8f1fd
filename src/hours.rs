//! Work-log reader and duration/cost calculator.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{Result, ToolError};

/// Columns expected in the work-log CSV.
pub const WORK_LOG_HEADER: [&str; 3] = ["start", "end", "note"];

/// One row of the work log with parsed timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkSession {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub note: String,
}

/// A work session with its computed duration and cost.
#[derive(Debug, Clone, PartialEq)]
pub struct BilledSession {
    pub session: WorkSession,
    pub duration_hrs: f64,
    pub cost_eur: f64,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    start: String,
    end: String,
    #[serde(default)]
    note: Option<String>,
}

/// Reads the work log, parsing `start` and `end` with `format`.
pub fn read_work_log(path: &Path, format: &str) -> Result<Vec<WorkSession>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut sessions = Vec::new();

    for record in reader.deserialize() {
        let raw: RawSession = record?;
        sessions.push(WorkSession {
            start: parse_timestamp(&raw.start, format)?,
            end: parse_timestamp(&raw.end, format)?,
            note: raw.note.unwrap_or_default(),
        });
    }

    Ok(sessions)
}

pub fn parse_timestamp(value: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).map_err(|_| ToolError::InvalidTimestamp {
        value: value.to_string(),
        format: format.to_string(),
    })
}

/// Computes the elapsed hours of each session and bills them at `hourly_rate`.
pub fn compute(sessions: Vec<WorkSession>, hourly_rate: f64) -> Vec<BilledSession> {
    sessions
        .into_iter()
        .map(|session| {
            let duration_hrs = (session.end - session.start).num_seconds() as f64 / 3600.0;
            BilledSession {
                session,
                duration_hrs,
                cost_eur: duration_hrs * hourly_rate,
            }
        })
        .collect()
}

/// Writes an empty work log holding only the header row.
pub fn write_placeholder(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(WORK_LOG_HEADER)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FORMAT: &str = "%d/%m/%Y_%H:%M";

    #[test]
    fn computes_duration_and_cost() {
        let sessions = vec![WorkSession {
            start: parse_timestamp("01/03/2024_09:00", FORMAT).unwrap(),
            end: parse_timestamp("01/03/2024_11:30", FORMAT).unwrap(),
            note: "analysis".into(),
        }];

        let billed = compute(sessions, 25.0);

        assert_eq!(billed[0].duration_hrs, 2.5);
        assert_eq!(billed[0].cost_eur, 62.5);
    }

    #[test]
    fn reads_log_with_optional_notes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(
            &path,
            "start,end,note\n01/03/2024_09:00,01/03/2024_10:15,setup\n02/03/2024_14:00,02/03/2024_14:45,\n",
        )
        .unwrap();

        let sessions = read_work_log(&path, FORMAT).unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].note, "setup");
        assert_eq!(sessions[1].note, "");
        assert_eq!(
            sessions[1].start,
            parse_timestamp("02/03/2024_14:00", FORMAT).unwrap()
        );
    }

    #[test]
    fn rejects_timestamps_in_another_format() {
        let result = parse_timestamp("2024-03-01 09:00", FORMAT);
        assert!(matches!(result, Err(ToolError::InvalidTimestamp { .. })));
    }

    #[test]
    fn placeholder_contains_only_the_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("log.csv");

        write_placeholder(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "start,end,note\n");
    }
}
