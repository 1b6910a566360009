//! Models registered by the library module.

pub mod book;
pub mod partner;

pub use book::{sort_default, Book, BookState, AGE_DAYS, BOOK_FIELDS, RELEASE_DATE};
pub use partner::{partner_extension, PartnerBooks};

use crate::catalog::RelationDef;

/// Book model name.
pub const BOOK_MODEL: &str = "library.book";
/// Partner model name (owned by the base module).
pub const PARTNER_MODEL: &str = "res.partner";
/// Currency model name (owned by the base module).
pub const CURRENCY_MODEL: &str = "res.currency";

pub(crate) const BOOK_AUTHORS: &str = "library_book_authors";
pub(crate) const BOOK_PUBLISHER: &str = "library_book_publisher";
pub(crate) const BOOK_CURRENCY: &str = "library_book_currency";
pub(crate) const PARTNER_PUBLISHED_BOOKS: &str = "res_partner_published_books";
pub(crate) const PARTNER_AUTHORED_BOOKS: &str = "res_partner_authored_books";

/// Relations behind the relational fields of both models.
pub fn relations() -> Vec<RelationDef> {
    vec![
        RelationDef::many_to_many(BOOK_AUTHORS, BOOK_MODEL, "author_ids", PARTNER_MODEL),
        RelationDef::many_to_one(BOOK_PUBLISHER, BOOK_MODEL, "publisher_id", PARTNER_MODEL),
        RelationDef::many_to_one(BOOK_CURRENCY, BOOK_MODEL, "currency_id", CURRENCY_MODEL),
        RelationDef::one_to_many(
            PARTNER_PUBLISHED_BOOKS,
            PARTNER_MODEL,
            "published_book_ids",
            BOOK_MODEL,
            "publisher_id",
        ),
        RelationDef::many_to_many(
            PARTNER_AUTHORED_BOOKS,
            PARTNER_MODEL,
            "authored_book_ids",
            BOOK_MODEL,
        ),
    ]
}
