//! Computed fields and the hooks that serve them.
//!
//! A computed field is declared in the catalog with [`ComputedField`]
//! metadata; its behavior lives in a [`ComputedHooks`] implementation
//! registered here under the field name.
//!
//! [`ComputedField`]: crate::catalog::ComputedField

pub mod age;
mod clock;

pub use age::{
    apply_inverse, compute, compute_age, date_for_age, rewrite_condition, rewrite_search,
    AgeDaysField,
};
pub use clock::{Clock, FixedClock, SystemClock};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use library_proto::FilterExpr;

use crate::error::Error;
use crate::models::Book;

/// Compute, inverse and search hooks of one computed book field.
pub trait ComputedHooks: Send + Sync {
    /// Name of the computed field.
    fn field(&self) -> &'static str;

    /// Stored fields the value is derived from.
    fn depends(&self) -> &'static [&'static str];

    /// Set the field on every book.
    fn compute(&self, books: &mut [Book], today: NaiveDate);

    /// Write the field's current value back into its dependencies.
    /// Returns how many books changed.
    fn inverse(&self, books: &mut [Book], today: NaiveDate) -> Result<usize, Error>;

    /// Rewrite a single condition on the field into one on stored fields.
    fn search(&self, condition: &FilterExpr, today: NaiveDate) -> Result<FilterExpr, Error>;
}

/// Hooks of the computed fields of `library.book`, keyed by field name.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<&'static str, Arc<dyn ComputedHooks>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every hook this module ships.
    pub fn builtin() -> Self {
        Self::new().with_hooks(AgeDaysField)
    }

    /// Register hooks under their field name, replacing earlier ones.
    pub fn with_hooks(mut self, hooks: impl ComputedHooks + 'static) -> Self {
        self.hooks.insert(hooks.field(), Arc::new(hooks));
        self
    }

    /// Hooks for a field.
    pub fn get(&self, field: &str) -> Option<&dyn ComputedHooks> {
        self.hooks.get(field).map(|h| h.as_ref())
    }

    /// Registered field names, sorted.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = self.hooks.keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    /// Recompute every registered field on `books`.
    pub fn compute_all(&self, books: &mut [Book], today: NaiveDate) {
        for field in self.fields() {
            if let Some(hooks) = self.get(field) {
                hooks.compute(books, today);
            }
        }
    }

    /// Recompute only fields depending on one of `changed`.
    pub fn recompute_dependents(&self, books: &mut [Book], changed: &[&str], today: NaiveDate) {
        for field in self.fields() {
            if let Some(hooks) = self.get(field) {
                if hooks.depends().iter().any(|d| changed.contains(d)) {
                    hooks.compute(books, today);
                }
            }
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("fields", &self.fields())
            .finish()
    }
}
