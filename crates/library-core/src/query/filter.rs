//! Filter evaluation against in-memory rows.
//!
//! The host framework runs filters in its database; this evaluator gives
//! the same answers over `(field, value)` rows so rewritten filters can be
//! checked against the records they were written for.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Error;
use library_proto::{CompareOp, FilterExpr, SimpleFilter, Value};

/// Extract all field names referenced in a filter expression.
pub fn extract_filter_fields(filter: &FilterExpr) -> HashSet<String> {
    match filter {
        FilterExpr::And(items) | FilterExpr::Or(items) => {
            items.iter().map(|sf| sf.field().to_string()).collect()
        }
        single => {
            let mut fields = HashSet::new();
            if let Some(field) = single_field(single) {
                fields.insert(field.to_string());
            }
            fields
        }
    }
}

fn single_field(filter: &FilterExpr) -> Option<&str> {
    match filter {
        FilterExpr::In { field, .. }
        | FilterExpr::NotIn { field, .. }
        | FilterExpr::IsNull { field }
        | FilterExpr::IsNotNull { field }
        | FilterExpr::Other { field, .. } => Some(field),
        FilterExpr::And(_) | FilterExpr::Or(_) => None,
        comparison => comparison.as_comparison().map(|(field, _, _)| field),
    }
}

/// Evaluates filter expressions against rows.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate a filter expression against a row of field values.
    ///
    /// Returns `true` if the row matches the filter, `false` otherwise.
    pub fn evaluate(filter: &FilterExpr, row: &[(String, Value)]) -> Result<bool, Error> {
        match filter {
            FilterExpr::And(filters) => {
                for f in filters {
                    if !Self::evaluate_simple(f, row)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            FilterExpr::Or(filters) => {
                for f in filters {
                    if Self::evaluate_simple(f, row)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            FilterExpr::In { field, values } => {
                let field_value = Self::get_field_value(row, field);
                match field_value {
                    Some(fv) => Ok(values.iter().any(|v| Self::values_equal(fv, v))),
                    None => Ok(false),
                }
            }
            FilterExpr::NotIn { field, values } => {
                let field_value = Self::get_field_value(row, field);
                match field_value {
                    Some(fv) if !fv.is_null() => {
                        Ok(!values.iter().any(|v| Self::values_equal(fv, v)))
                    }
                    _ => Ok(false), // NULL never compares
                }
            }
            FilterExpr::IsNull { field } => {
                let field_value = Self::get_field_value(row, field);
                Ok(matches!(field_value, None | Some(Value::Null)))
            }
            FilterExpr::IsNotNull { field } => {
                let field_value = Self::get_field_value(row, field);
                Ok(!matches!(field_value, None | Some(Value::Null)))
            }
            FilterExpr::Other { field, op, .. } => Err(Error::UnsupportedSearch {
                field: field.clone(),
                reason: format!("operator {op} is only evaluated by the host"),
            }),
            comparison => {
                let Some((field, op, value)) = comparison.as_comparison() else {
                    return Ok(false);
                };
                let Some(field_value) = Self::get_field_value(row, field) else {
                    return Ok(false); // Missing field doesn't match
                };
                let matched = match op {
                    CompareOp::Eq => Self::values_equal(field_value, value),
                    CompareOp::Ne => {
                        !field_value.is_null() && !Self::values_equal(field_value, value)
                    }
                    ordering => Self::compare_values(field_value, value)
                        .map(|ord| Self::ordering_matches(ordering, ord))
                        .unwrap_or(false),
                };
                Ok(matched)
            }
        }
    }

    /// Evaluate a simple (non-compound) filter.
    fn evaluate_simple(filter: &SimpleFilter, row: &[(String, Value)]) -> Result<bool, Error> {
        Self::evaluate(&FilterExpr::from(filter.clone()), row)
    }

    fn ordering_matches(op: CompareOp, ord: Ordering) -> bool {
        match op {
            CompareOp::Lt => ord.is_lt(),
            CompareOp::Le => ord.is_le(),
            CompareOp::Gt => ord.is_gt(),
            CompareOp::Ge => ord.is_ge(),
            CompareOp::Eq => ord.is_eq(),
            CompareOp::Ne => ord.is_ne(),
        }
    }

    /// Get a field value from a row by name.
    fn get_field_value<'a>(row: &'a [(String, Value)], field: &str) -> Option<&'a Value> {
        row.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    /// Check if two values are equal.
    ///
    /// A list of ids equals an id it contains, the way x2many fields match.
    fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Id(a), Value::Id(b)) => a == b,
            (Value::IdList(ids), Value::Id(id)) => ids.contains(id),
            (Value::IdList(a), Value::IdList(b)) => a == b,
            (a, b) => Self::compare_values(a, b).is_some_and(Ordering::is_eq),
        }
    }

    /// Compare two values, returning their ordering if comparable.
    fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int64(b)) => Some((*a as i64).cmp(b)),
            (Value::Int64(a), Value::Int32(b)) => Some(a.cmp(&(*b as i64))),
            (Value::Float64(_), _) | (_, Value::Float64(_)) => {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Id(a), Value::Id(b)) => Some(a.cmp(b)),
            _ => None, // Incompatible types, or NULL
        }
    }
}
