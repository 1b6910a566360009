//! Field definitions for entities.

use super::types::FieldType;
use serde::{Deserialize, Serialize};

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Label shown in forms and lists.
    pub label: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field is required (non-nullable at the application level).
    pub required: bool,
    /// Tooltip text.
    pub help: Option<String>,
    /// Groups allowed to see the field. Empty means everyone.
    pub groups: Vec<String>,
    /// Lifecycle states in which the field is read-only.
    pub readonly_states: Vec<String>,
    /// Computed field definition if this is a derived field.
    pub computed: Option<ComputedField>,
}

/// Computed field definition.
///
/// The hooks themselves live in the computed-field registry; this only
/// records which of them exist so the host knows what it may call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedField {
    /// Stored fields the value is derived from.
    pub depends: Vec<String>,
    /// Persist the computed value in the table.
    pub stored: bool,
    /// Writing the field updates its dependencies.
    pub invertible: bool,
    /// Filters on the field are rewritten onto its dependencies.
    pub searchable: bool,
    /// Compute with elevated privileges, ignoring field groups.
    pub sudo: bool,
}

impl ComputedField {
    /// A non-stored field derived from `depends`.
    pub fn virtual_over(depends: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            depends: depends.into_iter().map(Into::into).collect(),
            stored: false,
            invertible: false,
            searchable: false,
            sudo: false,
        }
    }

    /// Mark as invertible.
    pub fn with_inverse(mut self) -> Self {
        self.invertible = true;
        self
    }

    /// Mark as searchable.
    pub fn with_search(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Compute with elevated privileges.
    pub fn with_sudo(mut self) -> Self {
        self.sudo = true;
        self
    }
}

impl FieldDef {
    /// Create a new optional field.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            help: None,
            groups: Vec::new(),
            readonly_states: Vec::new(),
            computed: None,
        }
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the tooltip.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Restrict visibility to a group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Make the field read-only while the record is in `state`.
    pub fn readonly_in(mut self, state: impl Into<String>) -> Self {
        self.readonly_states.push(state.into());
        self
    }

    /// Set as a computed field.
    pub fn computed(mut self, computed: ComputedField) -> Self {
        self.computed = Some(computed);
        self
    }

    /// Check if this is a computed field.
    pub fn is_computed(&self) -> bool {
        self.computed.is_some()
    }

    /// Whether the field has a column of its own.
    pub fn is_stored(&self) -> bool {
        self.computed.as_ref().map_or(true, |c| c.stored)
    }

    /// Whether filters on this field can be served.
    pub fn is_searchable(&self) -> bool {
        self.computed.as_ref().map_or(true, |c| c.searchable)
    }

    /// Whether the field is read-only in the given state.
    pub fn is_readonly_in(&self, state: &str) -> bool {
        self.readonly_states.iter().any(|s| s == state)
    }
}
