//! Project layout and runtime settings.
//!
//! Everything is derived from a project root and passed explicitly to the
//! pipelines; there is no process-wide configuration object.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// File name of the raw CPET workbook under `data/raw`.
pub const RAW_WORKBOOK: &str = "Respiratorio CPET BR.xlsx";
/// File name of the cleaned table under `data/interim`.
pub const CLEANED_TABLE: &str = "cleaned_data.csv";
/// File name of the work log under `data/raw`.
pub const WORK_LOG: &str = "worked_hours.csv";
/// File name of the styled hours report under `report/tables`.
pub const HOURS_REPORT: &str = "worked_hours.xlsx";

pub const DEFAULT_HOURLY_RATE: f64 = 25.0;
pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y_%H:%M";

/// Data directories below `<root>/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFolders {
    pub root: PathBuf,
    pub external: PathBuf,
    pub interim: PathBuf,
    pub processed: PathBuf,
    pub raw: PathBuf,
}

impl DataFolders {
    pub fn from_root(root: PathBuf) -> Self {
        Self {
            external: root.join("external"),
            interim: root.join("interim"),
            processed: root.join("processed"),
            raw: root.join("raw"),
            root,
        }
    }
}

/// Report directories below `<root>/report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFolders {
    pub root: PathBuf,
    pub figures: PathBuf,
    pub tables: PathBuf,
}

impl ReportFolders {
    pub fn from_root(root: PathBuf) -> Self {
        Self {
            figures: root.join("figures"),
            tables: root.join("tables"),
            root,
        }
    }
}

/// Directory layout of a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub logs: PathBuf,
    pub data: DataFolders,
    pub reports: ReportFolders,
}

impl ProjectPaths {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            logs: root.join("logs"),
            data: DataFolders::from_root(root.join("data")),
            reports: ReportFolders::from_root(root.join("report")),
            root,
        }
    }

    pub fn default_clean_input(&self) -> PathBuf {
        self.data.raw.join(RAW_WORKBOOK)
    }

    pub fn default_clean_output(&self) -> PathBuf {
        self.data.interim.join(CLEANED_TABLE)
    }

    pub fn default_hours_input(&self) -> PathBuf {
        self.data.raw.join(WORK_LOG)
    }

    pub fn default_hours_output(&self) -> PathBuf {
        self.reports.tables.join(HOURS_REPORT)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Filter directive, e.g. `info` or `cpet_tools=debug`.
    pub level: String,
    pub file_name: String,
    /// Also write logs to a timestamped file in `log_dir`.
    pub log_to_file: bool,
    pub log_dir: PathBuf,
    /// Number of run logs kept in `log_dir`, the current one included.
    pub max_log_files: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_name: "cpet_tools.log".to_string(),
            log_to_file: false,
            log_dir: PathBuf::from("logs"),
            max_log_files: 5,
        }
    }
}

impl LoggerConfig {
    /// Name of the log file for a run started at `now`.
    pub fn log_file_name(&self, now: NaiveDateTime) -> String {
        format!("{}_{}", now.format("%Y%m%d_%H%M%S"), self.file_name)
    }

    /// Whether `name` is a run log written by [`Self::log_file_name`].
    pub fn is_run_log(&self, name: &str) -> bool {
        name.len() == self.file_name.len() + 16 && name.ends_with(&format!("_{}", self.file_name))
    }
}

/// Settings of the hours/cost calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct HoursConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub hourly_rate: f64,
    /// `chrono` format of the `start` and `end` columns.
    pub datetime_format: String,
}

impl HoursConfig {
    pub fn for_project(paths: &ProjectPaths) -> Self {
        Self {
            input: paths.default_hours_input(),
            output: paths.default_hours_output(),
            hourly_rate: DEFAULT_HOURLY_RATE,
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    #[test]
    fn derives_layout_from_root() {
        let paths = ProjectPaths::from_root("/srv/thesis");

        assert_eq!(paths.logs, PathBuf::from("/srv/thesis/logs"));
        assert_eq!(paths.data.interim, PathBuf::from("/srv/thesis/data/interim"));
        assert_eq!(paths.reports.figures, PathBuf::from("/srv/thesis/report/figures"));
        assert_eq!(
            paths.default_clean_input(),
            PathBuf::from("/srv/thesis/data/raw/Respiratorio CPET BR.xlsx")
        );
    }

    #[test]
    fn serializes_paths_as_json() {
        let paths = ProjectPaths::from_root("/srv/thesis");
        let json = serde_json::to_value(&paths).unwrap();

        assert_eq!(json["data"]["raw"], "/srv/thesis/data/raw");
        assert_eq!(json["reports"]["tables"], "/srv/thesis/report/tables");
    }

    #[test]
    fn log_file_name_is_timestamped() {
        let config = LoggerConfig::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();

        assert_eq!(config.log_file_name(now), "20240506_070809_cpet_tools.log");
        assert!(config.is_run_log(&config.log_file_name(now)));
        assert!(!config.is_run_log("cpet_tools.log"));
        assert!(!config.is_run_log("20240506_070809_other.log"));
    }

    #[test]
    fn hours_defaults_follow_project_layout() {
        let config = HoursConfig::for_project(&ProjectPaths::from_root("/p"));

        assert_eq!(config.input, Path::new("/p/data/raw/worked_hours.csv"));
        assert_eq!(config.hourly_rate, 25.0);
        assert_eq!(config.datetime_format, "%d/%m/%Y_%H:%M");
    }
}
