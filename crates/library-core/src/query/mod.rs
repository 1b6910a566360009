//! Search support: filter evaluation and computed-field rewriting.

pub mod filter;
pub mod rewrite;

pub use filter::{extract_filter_fields, FilterEvaluator};
pub use rewrite::FilterRewriter;
