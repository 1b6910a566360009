//! Library management module: books, the partners behind them, and the
//! derived `age_days` field.
//!
//! The crate declares the `library.book` entity and the `res.partner`
//! extension as a [`SchemaBundle`], and implements the compute, inverse and
//! search hooks of `age_days`:
//!
//! ```
//! use chrono::NaiveDate;
//! use library_core::computed::compute_age;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let released = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! assert_eq!(compute_age(Some(released), today), 31.0);
//! ```

pub mod catalog;
pub mod computed;
pub mod error;
pub mod manifest;
pub mod models;
pub mod module;
pub mod query;
pub mod security;

pub use catalog::{EntityDef, FieldDef, RelationDef, SchemaBundle};
pub use computed::{Clock, ComputedHooks, FixedClock, HookRegistry, SystemClock};
pub use error::{Error, Result};
pub use manifest::ModuleManifest;
pub use models::{Book, BookState, PartnerBooks};
pub use module::LibraryModule;
pub use query::{FilterEvaluator, FilterRewriter};
pub use security::{FieldAccess, SecurityContext};

pub use library_proto as proto;
