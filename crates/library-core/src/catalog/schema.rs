//! Schema bundle - versioned snapshot of everything a module declares.

use super::{EntityDef, RelationDef};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A versioned snapshot of the declared schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaBundle {
    /// Schema version (monotonically increasing).
    pub version: u64,
    /// Entity definitions keyed by name.
    pub entities: HashMap<String, EntityDef>,
    /// Relation definitions keyed by name.
    pub relations: HashMap<String, RelationDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            entities: HashMap::new(),
            relations: HashMap::new(),
        }
    }

    /// Add an entity to the schema.
    ///
    /// An extension of an entity already in the bundle is merged into it;
    /// otherwise it is kept as declared, for the host to merge at load time.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        match self.entities.get_mut(&entity.name) {
            Some(existing) if entity.extension => existing.merge(entity),
            _ => {
                self.entities.insert(entity.name.clone(), entity);
            }
        }
        self
    }

    /// Add a relation to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.insert(relation.name.clone(), relation);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get an entity by name or fail.
    pub fn entity(&self, name: &str) -> Result<&EntityDef, Error> {
        self.get_entity(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Get a relation by name.
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    /// Get all relations declared by an entity.
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.from_entity == entity)
            .collect()
    }

    /// Get all relations pointing at an entity.
    pub fn relations_to(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.to_entity == entity)
            .collect()
    }

    /// List all entity names, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check that relational fields and relations agree.
    ///
    /// Every relational field must name a relation declared by that same
    /// entity and field, and every relation must start from an entity in
    /// the bundle. Target entities may live in other modules.
    pub fn validate(&self) -> Result<(), Error> {
        for entity in self.entities.values() {
            for field in &entity.fields {
                if let Some(relation) = field.field_type.relation() {
                    let declared = self
                        .get_relation(relation)
                        .is_some_and(|r| r.is_declared_by(&entity.name, &field.name));
                    if !declared {
                        return Err(Error::UnknownRelation(relation.to_string()));
                    }
                }
            }
        }
        for relation in self.relations.values() {
            let entity = self.entity(&relation.from_entity)?;
            if entity.get_field(&relation.from_field).is_none() {
                return Err(Error::UnknownField {
                    entity: relation.from_entity.clone(),
                    field: relation.from_field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Serialize the schema bundle to JSON for the host framework.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a schema bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for SchemaBundle {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDef, FieldType, ScalarType};

    fn sample_schema() -> SchemaBundle {
        let book = EntityDef::new("library.book", "Library Book")
            .with_field(FieldDef::new("name", "Title", FieldType::scalar(ScalarType::Char)))
            .with_field(FieldDef::new(
                "publisher_id",
                "Publisher",
                FieldType::relational("library_book_publisher"),
            ));
        let partner = EntityDef::extend("res.partner").with_field(FieldDef::new(
            "published_book_ids",
            "Published Book",
            FieldType::relational("res_partner_published_books"),
        ));

        SchemaBundle::new(1)
            .with_entity(book)
            .with_entity(partner)
            .with_relation(RelationDef::many_to_one(
                "library_book_publisher",
                "library.book",
                "publisher_id",
                "res.partner",
            ))
            .with_relation(RelationDef::one_to_many(
                "res_partner_published_books",
                "res.partner",
                "published_book_ids",
                "library.book",
                "publisher_id",
            ))
    }

    #[test]
    fn test_schema_bundle_builder() {
        let schema = sample_schema();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.entity_names(), vec!["library.book", "res.partner"]);
        assert_eq!(schema.relations.len(), 2);
        assert!(schema.get_entity("res.partner").unwrap().extension);
    }

    #[test]
    fn test_extension_merges_into_existing_entity() {
        let schema = SchemaBundle::new(1)
            .with_entity(
                EntityDef::new("res.partner", "Contact")
                    .with_field(FieldDef::new("name", "Name", FieldType::scalar(ScalarType::Char))),
            )
            .with_entity(EntityDef::extend("res.partner").with_field(FieldDef::new(
                "nickname",
                "Nickname",
                FieldType::scalar(ScalarType::Char),
            )));

        let partner = schema.get_entity("res.partner").unwrap();
        assert!(!partner.extension);
        assert_eq!(partner.fields.len(), 2);
    }

    #[test]
    fn test_relations_for_entity() {
        let schema = sample_schema();

        assert_eq!(schema.relations_from("library.book").len(), 1);
        assert_eq!(schema.relations_to("library.book").len(), 1);
        assert!(matches!(
            schema.entity("res.currency"),
            Err(Error::UnknownEntity(name)) if name == "res.currency"
        ));
    }

    #[test]
    fn test_validate() {
        assert!(sample_schema().validate().is_ok());

        let broken = sample_schema().with_entity(
            EntityDef::extend("library.book").with_field(FieldDef::new(
                "author_ids",
                "Authors",
                FieldType::relational("library_book_authors"),
            )),
        );
        assert!(matches!(
            broken.validate(),
            Err(Error::UnknownRelation(name)) if name == "library_book_authors"
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let schema = sample_schema();
        let json = schema.to_json().unwrap();
        let decoded = SchemaBundle::from_json(&json).unwrap();

        assert_eq!(schema, decoded);
    }
}
