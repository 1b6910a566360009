//! Book-related additions to the shared `res.partner` model.

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::{PARTNER_AUTHORED_BOOKS, PARTNER_MODEL, PARTNER_PUBLISHED_BOOKS};
use crate::catalog::{EntityDef, FieldDef, FieldType};

/// Fields this module adds to `res.partner`.
pub fn partner_extension() -> EntityDef {
    EntityDef::extend(PARTNER_MODEL)
        .with_field(FieldDef::new(
            "published_book_ids",
            "Published Book",
            FieldType::relational(PARTNER_PUBLISHED_BOOKS),
        ))
        .with_field(FieldDef::new(
            "authored_book_ids",
            "Authored Books",
            FieldType::relational(PARTNER_AUTHORED_BOOKS),
        ))
}

/// The book side of a partner, resolved from a set of books.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerBooks {
    /// Partner record id.
    pub partner_id: i64,
    /// Books whose publisher is this partner.
    pub published_book_ids: Vec<i64>,
    /// Books listing this partner among their authors.
    pub authored_book_ids: Vec<i64>,
}

impl PartnerBooks {
    /// Resolve both associations of `partner_id` over `books`.
    ///
    /// `published_book_ids` is the inverse of `Book::publisher_id` and
    /// `authored_book_ids` reads the same edge rows as `Book::author_ids`,
    /// so neither is stored on the partner.
    pub fn collect(partner_id: i64, books: &[Book]) -> Self {
        let published_book_ids = books
            .iter()
            .filter(|b| b.publisher_id == Some(partner_id))
            .map(|b| b.id)
            .collect();
        let authored_book_ids = books
            .iter()
            .filter(|b| b.author_ids.contains(&partner_id))
            .map(|b| b.id)
            .collect();
        Self {
            partner_id,
            published_book_ids,
            authored_book_ids,
        }
    }

    /// Whether the partner neither published nor wrote any of the books.
    pub fn is_empty(&self) -> bool {
        self.published_book_ids.is_empty() && self.authored_book_ids.is_empty()
    }
}
