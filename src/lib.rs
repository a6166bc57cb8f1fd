//! Core library for the cpet-tools command line application.
//!
//! Two independent pipelines live here. The CPET workbook cleaner in
//! [`cleaning`] turns a multi-sheet, one-sheet-per-patient workbook into one
//! tidy table, and the calculator in [`hours`] turns a CSV work log into a
//! styled billing workbook. File adapters live under [`io`], polars frame
//! helpers in [`frame`], and the file-to-file orchestration used by the binary
//! in [`sync`].

pub mod cleaning;
pub mod config;
pub mod error;
pub mod frame;
pub mod hours;
pub mod io;
pub mod logging;
pub mod sync;

pub use error::{Result, ToolError};
