//! Subcommand execution.

use library_core::computed::{compute_age, date_for_age};
use library_core::models::AGE_DAYS;
use library_core::{Clock, LibraryModule, ModuleManifest};
use library_proto::{FilterExpr, Value};
use tracing::debug;

use crate::formatter::Formatter;
use crate::Command;

/// Run a subcommand and return its formatted output.
pub fn execute(
    command: &Command,
    clock: &dyn Clock,
    formatter: &dyn Formatter,
) -> Result<String, library_core::Error> {
    match command {
        Command::Schema => {
            let module = LibraryModule::register()?;
            Ok(formatter.format_schema(&module.schema))
        }
        Command::Manifest { path } => {
            let manifest = match path {
                Some(path) => ModuleManifest::load(path)?,
                None => ModuleManifest::library_management(),
            };
            Ok(formatter.format_manifest(&manifest))
        }
        Command::Age { release_date } => {
            let today = clock.today();
            let age = compute_age(Some(*release_date), today);
            Ok(formatter.format_age(*release_date, today, age))
        }
        Command::ReleaseDate { age_days } => {
            let today = clock.today();
            let release_date = date_for_age(*age_days, today)?;
            Ok(formatter.format_release_date(*age_days, today, release_date))
        }
        Command::Search { op, value } => {
            let today = clock.today();
            let requested = FilterExpr::condition(AGE_DAYS, op, Value::Float64(*value));

            let module = LibraryModule::register()?;
            let rewritten = module.book_rewriter(today)?.rewrite(&requested)?;
            debug!(%requested, %rewritten, %today, "search rewritten");
            Ok(formatter.format_search(&requested, &rewritten, today))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{JsonFormatter, TableFormatter};
    use chrono::NaiveDate;
    use library_core::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_age() {
        let command = Command::Age {
            release_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let output = execute(&command, &clock(), &TableFormatter).unwrap();

        assert_eq!(output, "31 day(s) from 2024-05-01 to 2024-06-01");
    }

    #[test]
    fn test_release_date() {
        let command = Command::ReleaseDate { age_days: 31.5 };
        let output = execute(&command, &clock(), &TableFormatter).unwrap();

        assert!(output.ends_with("is 2024-05-01"));
    }

    #[test]
    fn test_search() {
        let command = Command::Search {
            op: ">".to_string(),
            value: 5.0,
        };
        let output = execute(&command, &clock(), &JsonFormatter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["today"], "2024-06-01");
        assert!(value["rewritten"].to_string().contains("2024-05-27"));
    }

    #[test]
    fn test_search_fractional_bound() {
        let command = Command::Search {
            op: ">=".to_string(),
            value: 5.5,
        };
        let output = execute(&command, &clock(), &TableFormatter).unwrap();

        assert!(output.ends_with("release_date <= 2024-05-26"));
    }

    #[test]
    fn test_search_keeps_unknown_operator() {
        let command = Command::Search {
            op: "like".to_string(),
            value: 5.0,
        };
        let output = execute(&command, &clock(), &TableFormatter).unwrap();

        assert_eq!(output, "age_days like 5  =>  release_date like 2024-05-27");
    }
}
