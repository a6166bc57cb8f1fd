use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cpet_tools::config::{
    DEFAULT_DATETIME_FORMAT, DEFAULT_HOURLY_RATE, HoursConfig, LoggerConfig, ProjectPaths,
};
use cpet_tools::logging::init_logging;
use cpet_tools::sync::{self, HoursOutcome};
use cpet_tools::Result;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = ProjectPaths::from_root(&cli.root);
    let logger = LoggerConfig {
        level: cli.log_level,
        log_to_file: cli.log_file,
        log_dir: paths.logs.clone(),
        ..LoggerConfig::default()
    };
    let _guard = init_logging(&logger)?;

    match cli.command {
        Command::Clean(args) => execute_clean(args, &paths),
        Command::Hours(args) => execute_hours(args, &paths),
        Command::Paths => {
            println!("{}", serde_json::to_string_pretty(&paths)?);
            Ok(())
        }
    }
}

fn execute_clean(args: CleanArgs, paths: &ProjectPaths) -> Result<()> {
    let input = args.input.unwrap_or_else(|| paths.default_clean_input());
    let output = args.output.unwrap_or_else(|| paths.default_clean_output());
    let report = sync::clean_workbook(&input, &output)?;
    for sheet in &report.skipped_sheets {
        eprintln!("warning: sheet '{sheet}' has no skip-row entry and was skipped");
    }
    println!("cleaned data written to {}", output.display());
    Ok(())
}

fn execute_hours(args: HoursArgs, paths: &ProjectPaths) -> Result<()> {
    let defaults = HoursConfig::for_project(paths);
    let config = HoursConfig {
        input: args.input.unwrap_or(defaults.input),
        output: args.output.unwrap_or(defaults.output),
        hourly_rate: args.rate,
        datetime_format: args.format,
    };

    match sync::calculate_hours(&config)? {
        HoursOutcome::Report { path, sessions } => {
            println!("client-ready report with {sessions} sessions written to {}", path.display());
        }
        HoursOutcome::PlaceholderCreated(path) => {
            println!(
                "no work log found; created an empty one at {}, fill it in and run again",
                path.display()
            );
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Clean CPET breath-frequency workbooks and bill worked hours."
)]
struct Cli {
    /// Project root; data, report and log folders are resolved below it.
    #[arg(long, global = true, env = "CPET_PROJECT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Log filter directive (RUST_LOG overrides it).
    #[arg(long, global = true, env = "CPET_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Also write logs to a timestamped file in `<root>/logs`.
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean the raw CPET workbook into one tidy table.
    Clean(CleanArgs),
    /// Compute worked hours and costs into a styled workbook.
    Hours(HoursArgs),
    /// Print the resolved project layout as JSON.
    Paths,
}

#[derive(clap::Args)]
struct CleanArgs {
    /// Path to the raw workbook.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path for the cleaned table (`.xlsx` writes a workbook, anything else CSV).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct HoursArgs {
    /// Path to the CSV work log with `start`, `end` and `note` columns.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path for the styled workbook.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hourly rate in euros.
    #[arg(long, default_value_t = DEFAULT_HOURLY_RATE)]
    rate: f64,

    /// chrono format of the `start` and `end` timestamps.
    #[arg(long, default_value = DEFAULT_DATETIME_FORMAT)]
    format: String,
}
