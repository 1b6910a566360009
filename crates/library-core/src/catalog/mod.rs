//! Declarative catalog for the library module.
//!
//! The catalog describes entities, their fields and the relations between
//! them. The host framework turns it into tables and forms.

mod entity;
mod field;
mod relation;
mod schema;
mod types;

pub use entity::{EntityDef, OrderBy, OrderDirection};
pub use field::{ComputedField, FieldDef};
pub use relation::{edge_table_name, Cardinality, DeleteBehavior, RelationDef};
pub use schema::SchemaBundle;
pub use types::{Digits, FieldType, ScalarType};
