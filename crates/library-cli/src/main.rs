//! Library module command-line tool.
//!
//! Prints the registered schema and manifest, and runs the `age_days`
//! transform for a given reference day.

mod commands;
mod formatter;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use library_core::{Clock, FixedClock, SystemClock};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Library module command-line tool
#[derive(Parser, Debug)]
#[command(name = "library")]
#[command(version, about = "Inspect the library module and compute book ages")]
pub struct Args {
    /// Reference day (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true, value_parser = parse_day)]
    pub today: Option<NaiveDate>,

    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the registered entities and their fields
    Schema,
    /// Print the module manifest
    Manifest {
        /// Read and validate a manifest file instead of the built-in one
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Days elapsed since a release date
    Age {
        /// Release date (YYYY-MM-DD)
        #[arg(value_parser = parse_day)]
        release_date: NaiveDate,
    },
    /// Release date for a number of days since release
    ReleaseDate {
        /// Days since release; fractions are truncated
        #[arg(allow_hyphen_values = true)]
        age_days: f64,
    },
    /// Rewrite `age_days <op> <value>` into a release date condition
    Search {
        /// Comparison operator (=, !=, <, <=, >, >=); others are passed through
        op: String,
        /// Days since release
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
}

fn parse_day(input: &str) -> Result<NaiveDate, String> {
    library_proto::parse_date(input).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("library_cli=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let clock: Box<dyn Clock> = match args.today {
        Some(day) => Box::new(FixedClock(day)),
        None => Box::new(SystemClock),
    };
    let formatter = formatter::create_formatter(args.format);

    let output = commands::execute(&args.command, clock.as_ref(), formatter.as_ref())?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["library", "--today", "2024-06-01", "age", "2024-05-01"]);

        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(args.format, OutputFormat::Table);
        assert!(matches!(args.command, Command::Age { .. }));
    }

    #[test]
    fn test_parse_negative_age() {
        let args = Args::parse_from(["library", "release-date", "-10", "--format", "json"]);

        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Command::ReleaseDate { age_days } if age_days == -10.0));
    }

    #[test]
    fn test_rejects_bad_day() {
        assert!(Args::try_parse_from(["library", "age", "June 1st"]).is_err());
    }
}
