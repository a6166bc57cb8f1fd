use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggerConfig;
use crate::error::{Result, ToolError};

/// Installs the global subscriber: stderr output plus an optional log file.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer when dropped and must live until exit.
pub fn init_logging(config: &LoggerConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|error| ToolError::Logging(error.to_string()))?;

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if config.log_to_file {
        fs::create_dir_all(&config.log_dir)?;
        prune_run_logs(config, config.max_log_files.saturating_sub(1))?;
        let now = chrono::Local::now().naive_local();
        let appender =
            tracing_appender::rolling::never(&config.log_dir, config.log_file_name(now));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))?;

    Ok(guard)
}

/// Deletes the oldest run logs so that at most `keep` remain in the log directory.
pub fn prune_run_logs(config: &LoggerConfig, keep: usize) -> Result<()> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(&config.log_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && config.is_run_log(&name) {
            logs.push((name, entry.path()));
        }
    }

    // Names start with a sortable timestamp.
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    for (_, path) in logs.into_iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(())
}
