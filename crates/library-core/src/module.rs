//! Registration of the library module with the host framework.

use chrono::NaiveDate;
use tracing::info;

use crate::catalog::{EntityDef, SchemaBundle};
use crate::computed::HookRegistry;
use crate::error::Error;
use crate::manifest::ModuleManifest;
use crate::models::{self, Book, BOOK_MODEL};
use crate::query::FilterRewriter;

/// Version of the schema this module declares.
pub const SCHEMA_VERSION: u64 = 1;

/// Everything the host framework needs to install the module.
#[derive(Debug, Clone)]
pub struct LibraryModule {
    pub manifest: ModuleManifest,
    pub schema: SchemaBundle,
    pub hooks: HookRegistry,
}

impl LibraryModule {
    /// Build and validate the module with its built-in manifest.
    pub fn register() -> Result<Self, Error> {
        Self::with_manifest(ModuleManifest::library_management())
    }

    /// Build and validate the module under a custom manifest.
    pub fn with_manifest(manifest: ModuleManifest) -> Result<Self, Error> {
        manifest.validate()?;

        let schema = models::relations().into_iter().fold(
            SchemaBundle::new(SCHEMA_VERSION)
                .with_entity(Book::entity_def())
                .with_entity(models::partner_extension()),
            SchemaBundle::with_relation,
        );
        schema.validate()?;

        let hooks = HookRegistry::builtin();
        let book = schema.entity(BOOK_MODEL)?;
        for field in book.computed_fields() {
            if hooks.get(&field.name).is_none() {
                return Err(Error::Manifest(format!(
                    "computed field {}.{} has no hooks",
                    book.name, field.name
                )));
            }
        }

        info!(
            module = %manifest.name,
            version = %manifest.version,
            entities = schema.entities.len(),
            relations = schema.relations.len(),
            computed = ?hooks.fields(),
            "module registered"
        );
        Ok(Self {
            manifest,
            schema,
            hooks,
        })
    }

    /// The book entity as registered.
    pub fn book_entity(&self) -> Result<&EntityDef, Error> {
        self.schema.entity(BOOK_MODEL)
    }

    /// A filter rewriter for books, resolving ages against `today`.
    pub fn book_rewriter(&self, today: NaiveDate) -> Result<FilterRewriter<'_>, Error> {
        Ok(FilterRewriter::new(self.book_entity()?, &self.hooks, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AGE_DAYS, PARTNER_MODEL};
    use library_proto::FilterExpr;

    #[test]
    fn test_register() {
        let module = LibraryModule::register().unwrap();

        assert_eq!(module.schema.version, SCHEMA_VERSION);
        assert_eq!(module.schema.entity_names(), vec![BOOK_MODEL, PARTNER_MODEL]);
        assert_eq!(module.schema.relations.len(), 5);
        assert!(module.schema.entity(PARTNER_MODEL).unwrap().extension);
        assert_eq!(module.hooks.fields(), vec![AGE_DAYS]);
    }

    #[test]
    fn test_register_rejects_invalid_manifest() {
        let manifest = ModuleManifest::new("library_management", "1.0");

        assert!(matches!(
            LibraryModule::with_manifest(manifest),
            Err(Error::Manifest(_))
        ));
    }

    #[test]
    fn test_book_rewriter() {
        let module = LibraryModule::register().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rewriter = module.book_rewriter(today).unwrap();

        let rewritten = rewriter.rewrite(&FilterExpr::gt(AGE_DAYS, 31i32)).unwrap();
        assert_eq!(
            rewritten,
            FilterExpr::lt("release_date", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
    }
}
