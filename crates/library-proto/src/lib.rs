//! Library catalog protocol types.
//!
//! This crate defines the values and filter expressions that cross the
//! boundary between the library catalog and the host framework that stores
//! and searches its records.
//!
//! # Modules
//!
//! - [`value`] - Runtime field values, including calendar dates
//! - [`filter`] - Filter IR and comparison operators
//! - [`error`] - Protocol error types
//!
//! Filters travel to the host as JSON:
//!
//! ```ignore
//! use library_proto::{CompareOp, FilterExpr};
//!
//! let filter = FilterExpr::compare("page", CompareOp::Gt, 300i32);
//! let json = library_proto::to_json(&filter)?;
//! let back = library_proto::filter_from_json(&json)?;
//! ```

pub mod error;
pub mod filter;
pub mod value;

pub use error::Error;

pub use filter::{CompareOp, FilterExpr, SimpleFilter};
pub use value::Value;

use chrono::NaiveDate;

/// Date format used on the host boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// Encode a filter as JSON for the host framework.
pub fn to_json(filter: &FilterExpr) -> Result<String, Error> {
    Ok(serde_json::to_string(filter)?)
}

/// Decode a filter received from the host framework.
pub fn filter_from_json(json: &str) -> Result<FilterExpr, Error> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(matches!(
            parse_date("2024-13-01"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_filter_json_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 27).unwrap();
        let filter = FilterExpr::and(vec![
            SimpleFilter::compare("release_date", CompareOp::Lt, d),
            SimpleFilter::IsNotNull {
                field: "publisher_id".into(),
            },
        ]);

        let json = to_json(&filter).unwrap();
        assert_eq!(filter_from_json(&json).unwrap(), filter);
    }

    #[test]
    fn test_filter_json_rejects_garbage() {
        assert!(matches!(
            filter_from_json("{\"Between\":{}}"),
            Err(Error::Serialization(_))
        ));
    }
}
