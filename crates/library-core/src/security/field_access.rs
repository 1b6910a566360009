//! Field-level access rules and masking.
//!
//! Rules come straight from the catalog: `groups` limits who can read or
//! write a field, `readonly_states` locks it while the record is in one of
//! the listed states.

use library_proto::Value;
use tracing::debug;

use super::context::SecurityContext;
use crate::catalog::{EntityDef, FieldDef};
use crate::error::Error;

/// Applies catalog field rules to rows and writes.
pub struct FieldAccess;

impl FieldAccess {
    /// Check if a field is readable in the given security context.
    pub fn can_read(field: &FieldDef, context: &SecurityContext) -> bool {
        if context.sudo || field.groups.is_empty() {
            return true;
        }
        context.has_any_group(&field.groups)
    }

    /// Replace every value the caller may not read with `Null`.
    ///
    /// Columns not declared on the entity (such as `id`) are left alone.
    /// Returns how many values were masked.
    pub fn mask_row(
        entity: &EntityDef,
        row: &mut [(String, Value)],
        context: &SecurityContext,
    ) -> usize {
        let mut masked = 0;
        for (name, value) in row.iter_mut() {
            let Some(field) = entity.get_field(name) else {
                continue;
            };
            if !Self::can_read(field, context) && !value.is_null() {
                *value = Value::Null;
                masked += 1;
            }
        }
        if masked > 0 {
            debug!(entity = %entity.name, user = context.user_id, masked, "masked restricted fields");
        }
        masked
    }

    /// Check that `field` may be written on a record in `state`.
    ///
    /// Group restrictions apply first; the read-only lock applies even
    /// under sudo, as it is a property of the record, not the caller.
    pub fn check_write(
        entity: &EntityDef,
        field: &str,
        state: Option<&str>,
        context: &SecurityContext,
    ) -> Result<(), Error> {
        let def = entity.get_field(field).ok_or_else(|| Error::UnknownField {
            entity: entity.name.clone(),
            field: field.to_string(),
        })?;

        if !Self::can_read(def, context) {
            return Err(Error::FieldAccessDenied {
                entity: entity.name.clone(),
                field: field.to_string(),
                required: def.groups.clone(),
            });
        }

        if let Some(state) = state.filter(|s| def.is_readonly_in(s)) {
            return Err(Error::ReadOnlyField {
                entity: entity.name.clone(),
                field: field.to_string(),
                state: state.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookState};

    fn user() -> SecurityContext {
        SecurityContext::new(2).with_group("base.group_user")
    }

    #[test]
    fn test_page_needs_group() {
        let entity = Book::entity_def();
        let page = entity.get_field("page").unwrap();
        let name = entity.get_field("name").unwrap();

        assert!(FieldAccess::can_read(page, &user()));
        assert!(!FieldAccess::can_read(page, &SecurityContext::new(3)));
        assert!(FieldAccess::can_read(page, &SecurityContext::new(3).elevated()));
        assert!(FieldAccess::can_read(name, &SecurityContext::new(3)));
    }

    #[test]
    fn test_mask_row() {
        let entity = Book::entity_def();
        let mut book = Book::new(1, "Dune", "dune");
        book.page = 412;
        let mut row = book.row();

        assert_eq!(FieldAccess::mask_row(&entity, &mut row, &user()), 0);

        let masked = FieldAccess::mask_row(&entity, &mut row, &SecurityContext::new(3));
        assert_eq!(masked, 1);
        assert!(row.contains(&("page".to_string(), Value::Null)));
        assert!(row.contains(&("id".to_string(), Value::Id(1))));
        assert!(row.contains(&("name".to_string(), Value::from("Dune"))));
    }

    #[test]
    fn test_lost_book_page_is_readonly() {
        let entity = Book::entity_def();
        let lost = Some(BookState::Lost.key());

        assert!(matches!(
            FieldAccess::check_write(&entity, "page", lost, &user()),
            Err(Error::ReadOnlyField { state, .. }) if state == "lost"
        ));
        assert!(matches!(
            FieldAccess::check_write(&entity, "page", lost, &user().elevated()),
            Err(Error::ReadOnlyField { .. })
        ));
        assert!(FieldAccess::check_write(&entity, "page", Some("available"), &user()).is_ok());
        assert!(FieldAccess::check_write(&entity, "page", None, &user()).is_ok());
        assert!(FieldAccess::check_write(&entity, "name", lost, &user()).is_ok());
    }

    #[test]
    fn test_write_denied_without_group() {
        let entity = Book::entity_def();

        assert!(matches!(
            FieldAccess::check_write(&entity, "page", None, &SecurityContext::new(3)),
            Err(Error::FieldAccessDenied { required, .. }) if required == vec!["base.group_user".to_string()]
        ));
        assert!(matches!(
            FieldAccess::check_write(&entity, "isbn", None, &user()),
            Err(Error::UnknownField { .. })
        ));
    }
}
