//! Output formatters for command results.

use chrono::NaiveDate;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use library_core::catalog::{FieldDef, SchemaBundle};
use library_core::ModuleManifest;
use library_proto::FilterExpr;
use serde_json::json;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format the registered schema.
    fn format_schema(&self, schema: &SchemaBundle) -> String;

    /// Format a module manifest.
    fn format_manifest(&self, manifest: &ModuleManifest) -> String;

    /// Format a computed age.
    fn format_age(&self, release_date: NaiveDate, today: NaiveDate, age_days: f64) -> String;

    /// Format the release date found for an age.
    fn format_release_date(&self, age_days: f64, today: NaiveDate, release_date: NaiveDate)
        -> String;

    /// Format a rewritten search condition.
    fn format_search(&self, requested: &FilterExpr, rewritten: &FilterExpr, today: NaiveDate)
        -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &SchemaBundle) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Entity", "Field", "Label", "Type", "Notes"]);

        for name in schema.entity_names() {
            let Some(entity) = schema.get_entity(name) else {
                continue;
            };
            for field in &entity.fields {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(&field.name),
                    Cell::new(&field.label),
                    Cell::new(field.field_type.to_string()),
                    Cell::new(field_notes(field)),
                ]);
            }
        }

        table.to_string()
    }

    fn format_manifest(&self, manifest: &ModuleManifest) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Key", "Value"]);

        table.add_row(vec!["name", manifest.name.as_str()]);
        table.add_row(vec!["version", manifest.version.as_str()]);
        table.add_row(vec!["category", manifest.category.as_str()]);
        table.add_row(vec!["author", manifest.author.as_str()]);
        table.add_row(vec!["website", manifest.website.as_str()]);
        table.add_row(vec!["summary", manifest.summary.as_str()]);
        table.add_row(vec!["depends".to_string(), manifest.depends.join(", ")]);
        table.add_row(vec!["data".to_string(), manifest.data.join("\n")]);
        if !manifest.demo.is_empty() {
            table.add_row(vec!["demo".to_string(), manifest.demo.join("\n")]);
        }

        table.to_string()
    }

    fn format_age(&self, release_date: NaiveDate, today: NaiveDate, age_days: f64) -> String {
        format!("{} day(s) from {} to {}", age_days, release_date, today)
    }

    fn format_release_date(
        &self,
        age_days: f64,
        today: NaiveDate,
        release_date: NaiveDate,
    ) -> String {
        format!("{} day(s) before {} is {}", age_days, today, release_date)
    }

    fn format_search(
        &self,
        requested: &FilterExpr,
        rewritten: &FilterExpr,
        _today: NaiveDate,
    ) -> String {
        format!("{}  =>  {}", requested, rewritten)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &SchemaBundle) -> String {
        to_pretty(&serde_json::to_value(schema).unwrap_or_default())
    }

    fn format_manifest(&self, manifest: &ModuleManifest) -> String {
        to_pretty(&serde_json::to_value(manifest).unwrap_or_default())
    }

    fn format_age(&self, release_date: NaiveDate, today: NaiveDate, age_days: f64) -> String {
        to_pretty(&json!({
            "release_date": release_date.to_string(),
            "today": today.to_string(),
            "age_days": age_days,
        }))
    }

    fn format_release_date(
        &self,
        age_days: f64,
        today: NaiveDate,
        release_date: NaiveDate,
    ) -> String {
        to_pretty(&json!({
            "age_days": age_days,
            "today": today.to_string(),
            "release_date": release_date.to_string(),
        }))
    }

    fn format_search(
        &self,
        requested: &FilterExpr,
        rewritten: &FilterExpr,
        today: NaiveDate,
    ) -> String {
        to_pretty(&json!({
            "today": today.to_string(),
            "requested": serde_json::to_value(requested).unwrap_or_default(),
            "rewritten": serde_json::to_value(rewritten).unwrap_or_default(),
        }))
    }
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Short flags shown next to a field in the schema table.
fn field_notes(field: &FieldDef) -> String {
    let mut notes = Vec::new();
    if field.required {
        notes.push("required".to_string());
    }
    if let Some(computed) = &field.computed {
        let mut flags = vec![format!("computed from {}", computed.depends.join(", "))];
        if computed.invertible {
            flags.push("inverse".to_string());
        }
        if computed.searchable {
            flags.push("search".to_string());
        }
        notes.push(flags.join(", "));
    }
    if !field.groups.is_empty() {
        notes.push(format!("groups: {}", field.groups.join(", ")));
    }
    if !field.readonly_states.is_empty() {
        notes.push(format!("read-only in {}", field.readonly_states.join(", ")));
    }
    notes.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use library_core::LibraryModule;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_table_schema_lists_fields() {
        let module = LibraryModule::register().unwrap();
        let output = TableFormatter.format_schema(&module.schema);

        assert!(output.contains("age_days"));
        assert!(output.contains("computed from release_date, inverse, search"));
        assert!(output.contains("read-only in lost"));
        assert!(output.contains("published_book_ids"));
    }

    #[test]
    fn test_json_age() {
        let released = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let output = JsonFormatter.format_age(released, today(), 31.0);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["age_days"], 31.0);
        assert_eq!(value["release_date"], "2024-05-01");
    }

    #[test]
    fn test_json_manifest() {
        let output = JsonFormatter.format_manifest(&ModuleManifest::library_management());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["name"], "library_management");
        assert_eq!(value["depends"][0], "base");
    }
}
