//! Field-level security for the catalog.

mod context;
mod field_access;

pub use context::SecurityContext;
pub use field_access::FieldAccess;
