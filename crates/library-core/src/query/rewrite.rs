//! Rewriting filters on computed fields into filters on stored fields.

use chrono::NaiveDate;
use library_proto::{FilterExpr, SimpleFilter};
use tracing::debug;

use crate::catalog::EntityDef;
use crate::computed::HookRegistry;
use crate::error::Error;

/// Replaces conditions on computed fields with their search-hook output.
///
/// Conditions on stored fields are passed through untouched, so the result
/// only references columns the host can query.
pub struct FilterRewriter<'a> {
    entity: &'a EntityDef,
    hooks: &'a HookRegistry,
    today: NaiveDate,
}

impl<'a> FilterRewriter<'a> {
    /// Create a rewriter for `entity`, resolving relative dates against `today`.
    pub fn new(entity: &'a EntityDef, hooks: &'a HookRegistry, today: NaiveDate) -> Self {
        Self {
            entity,
            hooks,
            today,
        }
    }

    /// Rewrite a filter expression.
    pub fn rewrite(&self, filter: &FilterExpr) -> Result<FilterExpr, Error> {
        match filter {
            FilterExpr::And(items) => Ok(FilterExpr::And(self.rewrite_all(items)?)),
            FilterExpr::Or(items) => Ok(FilterExpr::Or(self.rewrite_all(items)?)),
            single => self.rewrite_single(single),
        }
    }

    fn rewrite_all(&self, items: &[SimpleFilter]) -> Result<Vec<SimpleFilter>, Error> {
        items
            .iter()
            .map(|item| -> Result<SimpleFilter, Error> {
                let rewritten = self.rewrite_single(&FilterExpr::from(item.clone()))?;
                Ok(SimpleFilter::try_from(rewritten)?)
            })
            .collect()
    }

    fn rewrite_single(&self, filter: &FilterExpr) -> Result<FilterExpr, Error> {
        let field_name = match filter.as_comparison() {
            Some((field, _, _)) => field,
            None => match filter {
                FilterExpr::In { field, .. }
                | FilterExpr::NotIn { field, .. }
                | FilterExpr::IsNull { field }
                | FilterExpr::IsNotNull { field }
                | FilterExpr::Other { field, .. } => field.as_str(),
                _ => return Ok(filter.clone()),
            },
        };
        if field_name == "id" {
            return Ok(filter.clone());
        }

        let field = self
            .entity
            .get_field(field_name)
            .ok_or_else(|| Error::UnknownField {
                entity: self.entity.name.clone(),
                field: field_name.to_string(),
            })?;
        if !field.is_computed() || field.is_stored() {
            return Ok(filter.clone());
        }

        let unsupported = |reason: &str| Error::UnsupportedSearch {
            field: field_name.to_string(),
            reason: reason.to_string(),
        };
        if !field.is_searchable() {
            return Err(unsupported("field is computed and not searchable"));
        }
        let hooks = self
            .hooks
            .get(field_name)
            .ok_or_else(|| unsupported("no search hook registered"))?;

        let rewritten = hooks.search(filter, self.today)?;
        debug!(from = %filter, to = %rewritten, "rewrote computed field condition");
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComputedField, FieldDef, FieldType, ScalarType};
    use crate::models::{Book, AGE_DAYS, RELEASE_DATE};
    use library_proto::{CompareOp, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 1)
    }

    #[test]
    fn test_rewrites_age_comparison() {
        let entity = Book::entity_def();
        let hooks = HookRegistry::builtin();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        let rewritten = rewriter.rewrite(&FilterExpr::gt(AGE_DAYS, 5i32)).unwrap();
        assert_eq!(rewritten, FilterExpr::lt(RELEASE_DATE, date(2024, 5, 27)));
    }

    #[test]
    fn test_stored_fields_pass_through() {
        let entity = Book::entity_def();
        let hooks = HookRegistry::builtin();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        let filter = FilterExpr::eq("state", "available");
        assert_eq!(rewriter.rewrite(&filter).unwrap(), filter);

        let by_id = FilterExpr::eq("id", Value::Id(3));
        assert_eq!(rewriter.rewrite(&by_id).unwrap(), by_id);
    }

    #[test]
    fn test_rewrites_inside_and_or() {
        let entity = Book::entity_def();
        let hooks = HookRegistry::builtin();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        let filter = FilterExpr::and(vec![
            SimpleFilter::compare(AGE_DAYS, CompareOp::Le, 0i32),
            SimpleFilter::compare("state", CompareOp::Ne, "lost"),
        ]);
        let expected = FilterExpr::and(vec![
            SimpleFilter::compare(RELEASE_DATE, CompareOp::Ge, today()),
            SimpleFilter::compare("state", CompareOp::Ne, "lost"),
        ]);
        assert_eq!(rewriter.rewrite(&filter).unwrap(), expected);
    }

    #[test]
    fn test_rejects_unknown_and_unsearchable() {
        let entity = Book::entity_def().with_field(
            FieldDef::new("score", "Score", FieldType::scalar(ScalarType::Float(None)))
                .computed(ComputedField::virtual_over(["reader_rating"])),
        );
        let hooks = HookRegistry::builtin();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        assert!(matches!(
            rewriter.rewrite(&FilterExpr::eq("isbn", "x")),
            Err(Error::UnknownField { .. })
        ));
        assert!(matches!(
            rewriter.rewrite(&FilterExpr::gt("score", 1i32)),
            Err(Error::UnsupportedSearch { .. })
        ));
    }

    #[test]
    fn test_unknown_operator_reaches_hook() {
        let entity = Book::entity_def();
        let hooks = HookRegistry::builtin();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        let filter = FilterExpr::or(vec![
            SimpleFilter::Other {
                field: AGE_DAYS.into(),
                op: "=like".into(),
                value: Value::Int32(5),
            },
            SimpleFilter::Other {
                field: "name".into(),
                op: "ilike".into(),
                value: Value::from("dune"),
            },
        ]);
        let expected = FilterExpr::or(vec![
            SimpleFilter::Other {
                field: RELEASE_DATE.into(),
                op: "=like".into(),
                value: Value::Date(date(2024, 5, 27)),
            },
            SimpleFilter::Other {
                field: "name".into(),
                op: "ilike".into(),
                value: Value::from("dune"),
            },
        ]);
        assert_eq!(rewriter.rewrite(&filter).unwrap(), expected);
    }

    #[test]
    fn test_missing_hook() {
        let entity = Book::entity_def();
        let hooks = HookRegistry::new();
        let rewriter = FilterRewriter::new(&entity, &hooks, today());

        assert!(matches!(
            rewriter.rewrite(&FilterExpr::gt(AGE_DAYS, 1i32)),
            Err(Error::UnsupportedSearch { reason, .. }) if reason == "no search hook registered"
        ));
    }
}
