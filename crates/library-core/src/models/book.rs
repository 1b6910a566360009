//! The `library.book` model.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use library_proto::Value;
use serde::{Deserialize, Serialize};

use super::{BOOK_AUTHORS, BOOK_CURRENCY, BOOK_MODEL, BOOK_PUBLISHER};
use crate::catalog::{ComputedField, Digits, EntityDef, FieldDef, FieldType, OrderBy, ScalarType};
use crate::error::Error;

/// Name of the derived age field.
pub const AGE_DAYS: &str = "age_days";

/// Name of the stored date the age is derived from.
pub const RELEASE_DATE: &str = "release_date";

/// Availability of a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookState {
    /// Not available for lending.
    Draft,
    /// On the shelf.
    Available,
    /// Lost; page count is frozen.
    Lost,
}

impl BookState {
    /// All states in display order.
    pub const ALL: [BookState; 3] = [BookState::Draft, BookState::Available, BookState::Lost];

    /// Selection key.
    pub fn key(self) -> &'static str {
        match self {
            BookState::Draft => "draft",
            BookState::Available => "available",
            BookState::Lost => "lost",
        }
    }

    /// Selection label.
    pub fn label(self) -> &'static str {
        match self {
            BookState::Draft => "Not Available",
            BookState::Available => "Available",
            BookState::Lost => "Lost",
        }
    }
}

impl FromStr for BookState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookState::ALL
            .into_iter()
            .find(|state| state.key() == s)
            .ok_or_else(|| mismatch("state", "one of draft, available, lost"))
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A book record as handed over by the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Record id.
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub notes: Option<String>,
    pub desc: Option<String>,
    pub cover: Option<Vec<u8>>,
    pub out_of_print: bool,
    pub release_date: Option<NaiveDate>,
    pub date_updated: Option<NaiveDateTime>,
    pub state: Option<BookState>,
    pub page: i32,
    pub reader_rating: f64,
    pub cost_price: f64,
    pub currency_id: Option<i64>,
    pub retail_price: f64,
    pub author_ids: Vec<i64>,
    pub publisher_id: Option<i64>,
    /// Days since release as of the last compute. Never persisted.
    #[serde(default)]
    pub age_days: f64,
}

/// Every field name of the model, in declaration order.
pub const BOOK_FIELDS: [&str; 17] = [
    "name",
    "short_name",
    "notes",
    "desc",
    "cover",
    "out_of_print",
    RELEASE_DATE,
    "date_updated",
    "state",
    "page",
    "reader_rating",
    "cost_price",
    "currency_id",
    "retail_price",
    "author_ids",
    "publisher_id",
    AGE_DAYS,
];

impl Book {
    /// Create a book with the two required titles set.
    pub fn new(id: i64, name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: short_name.into(),
            notes: None,
            desc: None,
            cover: None,
            out_of_print: false,
            release_date: None,
            date_updated: None,
            state: None,
            page: 0,
            reader_rating: 0.0,
            cost_price: 0.0,
            currency_id: None,
            retail_price: 0.0,
            author_ids: Vec::new(),
            publisher_id: None,
            age_days: 0.0,
        }
    }

    /// Set the release date.
    pub fn released_on(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Set the lifecycle state.
    pub fn in_state(mut self, state: BookState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the publisher.
    pub fn published_by(mut self, partner_id: i64) -> Self {
        self.publisher_id = Some(partner_id);
        self
    }

    /// Add an author.
    pub fn written_by(mut self, partner_id: i64) -> Self {
        self.author_ids.push(partner_id);
        self
    }

    /// Display name (the short title).
    pub fn display_name(&self) -> &str {
        &self.short_name
    }

    /// Schema of the model.
    pub fn entity_def() -> EntityDef {
        let scalar = FieldType::scalar;
        EntityDef::new(BOOK_MODEL, BOOK_MODEL)
            .with_rec_name("short_name")
            .with_order(OrderBy::desc(RELEASE_DATE))
            .with_order(OrderBy::asc("name"))
            .with_fields([
                FieldDef::new("name", "Title", scalar(ScalarType::Char)).required(),
                FieldDef::new("short_name", "Short Title", scalar(ScalarType::Char)).required(),
                FieldDef::new("notes", "Internal Notes", scalar(ScalarType::Text)),
                FieldDef::new(
                    "desc",
                    "Description",
                    scalar(ScalarType::Html {
                        sanitize: true,
                        strip_style: false,
                    }),
                ),
                FieldDef::new("cover", "Book Cover", scalar(ScalarType::Binary)),
                FieldDef::new("out_of_print", "Out of Print?", scalar(ScalarType::Bool)),
                FieldDef::new(RELEASE_DATE, "Release Date", scalar(ScalarType::Date)),
                FieldDef::new("date_updated", "Last updated", scalar(ScalarType::DateTime)),
                FieldDef::new(
                    "state",
                    "State",
                    FieldType::selection(BookState::ALL.map(|s| (s.key(), s.label()))),
                ),
                FieldDef::new("page", "Number of Pages", scalar(ScalarType::Integer))
                    .with_group("base.group_user")
                    .readonly_in(BookState::Lost.key())
                    .with_help("Total book page count"),
                FieldDef::new(
                    "reader_rating",
                    "Reader Average Rating",
                    scalar(ScalarType::Float(Some(Digits::Fixed {
                        precision: 14,
                        scale: 4,
                    }))),
                ),
                FieldDef::new(
                    "cost_price",
                    "Book Cost",
                    scalar(ScalarType::Float(Some(Digits::Named("Book Price".into())))),
                ),
                FieldDef::new("currency_id", "Currency", FieldType::relational(BOOK_CURRENCY)),
                FieldDef::new(
                    "retail_price",
                    "Retail Price",
                    scalar(ScalarType::Monetary {
                        currency_field: "currency_id".into(),
                    }),
                ),
                FieldDef::new("author_ids", "Authors", FieldType::relational(BOOK_AUTHORS)),
                FieldDef::new("publisher_id", "Publisher", FieldType::relational(BOOK_PUBLISHER)),
                FieldDef::new(AGE_DAYS, "Days Since Release", scalar(ScalarType::Float(None)))
                    .computed(
                        ComputedField::virtual_over([RELEASE_DATE])
                            .with_inverse()
                            .with_search()
                            .with_sudo(),
                    ),
            ])
    }

    /// Read a field as a runtime value.
    pub fn get(&self, field: &str) -> Result<Value, Error> {
        let value = match field {
            "id" => Value::Id(self.id),
            "name" => Value::from(self.name.as_str()),
            "short_name" => Value::from(self.short_name.as_str()),
            "notes" => Value::from(self.notes.clone()),
            "desc" => Value::from(self.desc.clone()),
            "cover" => self.cover.clone().map_or(Value::Null, Value::Bytes),
            "out_of_print" => Value::Bool(self.out_of_print),
            RELEASE_DATE => Value::from(self.release_date),
            "date_updated" => Value::from(self.date_updated),
            "state" => self.state.map_or(Value::Null, |s| Value::from(s.key())),
            "page" => Value::Int32(self.page),
            "reader_rating" => Value::Float64(self.reader_rating),
            "cost_price" => Value::Float64(self.cost_price),
            "currency_id" => self.currency_id.map_or(Value::Null, Value::Id),
            "retail_price" => Value::Float64(self.retail_price),
            "author_ids" => Value::IdList(self.author_ids.clone()),
            "publisher_id" => self.publisher_id.map_or(Value::Null, Value::Id),
            AGE_DAYS => Value::Float64(self.age_days),
            _ => return Err(unknown_field(field)),
        };
        Ok(value)
    }

    /// Write a runtime value into a field.
    ///
    /// Writing `age_days` only stores the value; the caller runs the
    /// inverse hook to carry it over to `release_date`.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), Error> {
        match field {
            "name" => self.name = required_string(field, value)?,
            "short_name" => self.short_name = required_string(field, value)?,
            "notes" => self.notes = optional_string(field, value)?,
            "desc" => self.desc = optional_string(field, value)?,
            "cover" => {
                self.cover = match value {
                    Value::Null => None,
                    Value::Bytes(b) => Some(b),
                    _ => return Err(mismatch(field, "bytes")),
                }
            }
            "out_of_print" => {
                self.out_of_print = value.as_bool().ok_or_else(|| mismatch(field, "bool"))?
            }
            RELEASE_DATE => {
                self.release_date = match value {
                    Value::Null => None,
                    Value::Date(d) => Some(d),
                    Value::String(s) => Some(library_proto::parse_date(&s)?),
                    _ => return Err(mismatch(field, "date")),
                }
            }
            "date_updated" => {
                self.date_updated = match value {
                    Value::Null => None,
                    Value::DateTime(dt) => Some(dt),
                    _ => return Err(mismatch(field, "datetime")),
                }
            }
            "state" => {
                self.state = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.parse()?),
                    _ => return Err(mismatch(field, "selection key")),
                }
            }
            "page" => {
                self.page = value
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| mismatch(field, "32-bit integer"))?
            }
            "reader_rating" => self.reader_rating = number(field, &value)?,
            "cost_price" => self.cost_price = number(field, &value)?,
            "retail_price" => self.retail_price = number(field, &value)?,
            "currency_id" => self.currency_id = optional_id(field, value)?,
            "publisher_id" => self.publisher_id = optional_id(field, value)?,
            "author_ids" => {
                self.author_ids = match value {
                    Value::IdList(ids) => ids,
                    Value::Null => Vec::new(),
                    _ => return Err(mismatch(field, "id list")),
                }
            }
            AGE_DAYS => self.age_days = number(field, &value)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    /// All fields as `(name, value)` pairs, the shape filters evaluate on.
    pub fn row(&self) -> Vec<(String, Value)> {
        std::iter::once("id")
            .chain(BOOK_FIELDS)
            .filter_map(|name| self.get(name).ok().map(|v| (name.to_string(), v)))
            .collect()
    }
}

/// Sort in the model's default order: `release_date desc, name`.
///
/// Undated books come first, as a descending database sort places nulls.
pub fn sort_default(books: &mut [Book]) {
    books.sort_by(|a, b| {
        release_desc(&a.release_date, &b.release_date).then_with(|| a.name.cmp(&b.name))
    });
}

fn release_desc(a: &Option<NaiveDate>, b: &Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(x),
    }
}

fn unknown_field(field: &str) -> Error {
    Error::UnknownField {
        entity: BOOK_MODEL.to_string(),
        field: field.to_string(),
    }
}

fn mismatch(field: &str, expected: &'static str) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
    }
}

fn required_string(field: &str, value: Value) -> Result<String, Error> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s),
        _ => Err(mismatch(field, "non-empty string")),
    }
}

fn optional_string(field: &str, value: Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(mismatch(field, "string")),
    }
}

fn optional_id(field: &str, value: Value) -> Result<Option<i64>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Id(id) => Ok(Some(id)),
        _ => Err(mismatch(field, "record id")),
    }
}

fn number(field: &str, value: &Value) -> Result<f64, Error> {
    value.as_f64().ok_or_else(|| mismatch(field, "number"))
}
