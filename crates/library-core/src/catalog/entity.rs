//! Entity definitions.

use super::field::FieldDef;
use serde::{Deserialize, Serialize};

/// An entity definition (model schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (unique within schema), e.g. `library.book`.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Field used as the record's display name.
    pub rec_name: String,
    /// Field definitions.
    pub fields: Vec<FieldDef>,
    /// Default ordering for searches without explicit order.
    pub default_order: Vec<OrderBy>,
    /// Whether this definition adds fields to an entity declared elsewhere.
    pub extension: bool,
}

/// Order specification for default ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field name to order by.
    pub field: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rec_name: "name".to_string(),
            fields: Vec::new(),
            default_order: Vec::new(),
            extension: false,
        }
    }

    /// Create an extension of an entity owned by another module.
    pub fn extend(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            rec_name: "name".to_string(),
            fields: Vec::new(),
            default_order: Vec::new(),
            extension: true,
        }
    }

    /// Set the display-name field.
    pub fn with_rec_name(mut self, field: impl Into<String>) -> Self {
        self.rec_name = field.into();
        self
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Append to the default ordering.
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.default_order.push(order);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All computed fields.
    pub fn computed_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_computed())
    }

    /// Fields with a column of their own.
    pub fn stored_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_stored())
    }

    /// Merge an extension's fields into this entity.
    ///
    /// Fields already present are replaced, matching how an inheriting
    /// module redefines a field.
    pub fn merge(&mut self, extension: EntityDef) {
        for field in extension.fields {
            match self.fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field,
                None => self.fields.push(field),
            }
        }
    }
}

impl OrderBy {
    /// Create ascending order.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create descending order.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }
}
