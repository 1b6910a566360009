//! Relation definitions between entities.

use serde::{Deserialize, Serialize};

/// Cardinality of a relation, seen from the declaring side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// Many records point at one (foreign key on the declaring side).
    ManyToOne,
    /// One record is pointed at by many (foreign key on the other side).
    OneToMany,
    /// Many-to-many relation through an edge table.
    ManyToMany,
}

/// Behavior when a referenced record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteBehavior {
    /// Delete related records.
    Cascade,
    /// Prevent deletion if related records exist.
    Restrict,
    /// Set foreign key to null.
    SetNull,
}

/// A relation definition between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Relation name (unique within schema).
    pub name: String,
    /// Entity declaring the relational field.
    pub from_entity: String,
    /// Relational field on the declaring entity.
    pub from_field: String,
    /// Target entity.
    pub to_entity: String,
    /// Field on the target entity: the inverse foreign key for one-to-many,
    /// `id` otherwise.
    pub to_field: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Delete behavior.
    pub on_delete: DeleteBehavior,
    /// Edge table for many-to-many relations.
    pub edge_table: Option<String>,
}

impl RelationDef {
    /// Create a many-to-one relation. Deleting the target clears the key.
    pub fn many_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: "id".to_string(),
            cardinality: Cardinality::ManyToOne,
            on_delete: DeleteBehavior::SetNull,
            edge_table: None,
        }
    }

    /// Create a one-to-many relation backed by `inverse_field` on the target.
    pub fn one_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        inverse_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            from_field: from_field.into(),
            to_entity: to_entity.into(),
            to_field: inverse_field.into(),
            cardinality: Cardinality::OneToMany,
            on_delete: DeleteBehavior::SetNull,
            edge_table: None,
        }
    }

    /// Create a many-to-many relation.
    ///
    /// The edge table is named after both entities, smaller name first, so
    /// both sides of the relation land on the same table.
    pub fn many_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        let from_entity = from_entity.into();
        let to_entity = to_entity.into();
        let edge_table = edge_table_name(&from_entity, &to_entity);
        Self {
            name: name.into(),
            from_entity,
            from_field: from_field.into(),
            to_entity,
            to_field: "id".to_string(),
            cardinality: Cardinality::ManyToMany,
            on_delete: DeleteBehavior::Cascade,
            edge_table: Some(edge_table),
        }
    }

    /// Set delete behavior.
    pub fn with_on_delete(mut self, on_delete: DeleteBehavior) -> Self {
        self.on_delete = on_delete;
        self
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Check if the relation is declared by `entity` through `field`.
    pub fn is_declared_by(&self, entity: &str, field: &str) -> bool {
        self.from_entity == entity && self.from_field == field
    }
}

/// Default edge table for a many-to-many between two entities:
/// `library.book` + `res.partner` gives `library_book_res_partner_rel`.
pub fn edge_table_name(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!(
        "{}_{}_rel",
        first.replace('.', "_"),
        second.replace('.', "_")
    )
}
