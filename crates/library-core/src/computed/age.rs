//! `age_days`: days elapsed since a book's release date.
//!
//! The field has no column. It is computed from `release_date`, written
//! back into `release_date` by the inverse, and searched by rewriting the
//! condition onto `release_date`. Every function takes `today` so the three
//! directions agree on the reference day.

use chrono::{NaiveDate, TimeDelta};
use library_proto::{CompareOp, FilterExpr, SimpleFilter, Value};
use tracing::{debug, instrument};

use super::ComputedHooks;
use crate::error::Error;
use crate::models::{Book, AGE_DAYS, RELEASE_DATE};

/// Whole days from `release_date` to `today`.
///
/// Positive for past dates, negative for future ones, `0` without a date.
pub fn compute_age(release_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    match release_date {
        Some(date) => (today - date).num_days() as f64,
        None => 0.0,
    }
}

/// The date lying `age_days` whole days before `today`.
///
/// Fractional days are truncated toward zero.
pub fn date_for_age(age_days: f64, today: NaiveDate) -> Result<NaiveDate, Error> {
    days_before(age_days.trunc(), today)
}

/// `today` minus a whole number of days.
fn days_before(days: f64, today: NaiveDate) -> Result<NaiveDate, Error> {
    if !days.is_finite() {
        return Err(Error::InvalidDate(format!("age of {days} days")));
    }
    // `as` saturates, and try_days rejects anything that large
    TimeDelta::try_days(days as i64)
        .and_then(|delta| today.checked_sub_signed(delta))
        .ok_or_else(|| {
            Error::InvalidDate(format!("{today} minus {days} days is out of range"))
        })
}

/// Set `age_days` on every book from its release date.
#[instrument(level = "debug", skip(books), fields(count = books.len()))]
pub fn compute(books: &mut [Book], today: NaiveDate) {
    for book in books.iter_mut() {
        book.age_days = compute_age(book.release_date, today);
    }
}

/// Move each book's `age_days` back into its release date.
///
/// Only books that already have a release date are updated; the rest are
/// left as they are. `age_days` itself is not touched. Returns how many
/// books were updated. If any age gives no valid date, nothing is written.
#[instrument(level = "debug", skip(books), fields(count = books.len()))]
pub fn apply_inverse(books: &mut [Book], today: NaiveDate) -> Result<usize, Error> {
    let dates = books
        .iter()
        .filter(|b| b.release_date.is_some())
        .map(|b| date_for_age(b.age_days, today))
        .collect::<Result<Vec<_>, _>>()?;

    let dated = books.iter_mut().filter(|b| b.release_date.is_some());
    for (book, date) in dated.zip(&dates) {
        debug!(book = book.id, age_days = book.age_days, %date, "release date from age");
        book.release_date = Some(*date);
    }
    Ok(dates.len())
}

/// Turn a condition on `age_days` into the equivalent on `release_date`.
///
/// A larger age means an earlier date, so ordering operators flip; `=` and
/// `!=` keep their operator.
///
/// Ages are whole days, so a fractional bound is first moved to the whole
/// day that selects the same ages: down for `>` and `<=`, up for `>=` and
/// `<`. No whole age equals a fractional one, so `=` becomes a condition
/// nothing matches and `!=` one every dated book matches.
pub fn rewrite_search(op: CompareOp, value: f64, today: NaiveDate) -> Result<FilterExpr, Error> {
    if !value.is_finite() {
        return Err(Error::InvalidDate(format!("age of {value} days")));
    }
    let whole = match op {
        CompareOp::Gt | CompareOp::Le => value.floor(),
        CompareOp::Ge | CompareOp::Lt => value.ceil(),
        CompareOp::Eq if value.fract() != 0.0 => return Ok(never()),
        CompareOp::Ne if value.fract() != 0.0 => return Ok(dated()),
        CompareOp::Eq | CompareOp::Ne => value,
    };
    let threshold = days_before(whole, today)?;
    Ok(FilterExpr::compare(RELEASE_DATE, op.mirrored(), threshold))
}

/// Turn any single condition on `age_days` into one on `release_date`.
///
/// `in`/`not in` map each whole-day age to its date; fractional members
/// can never match and are dropped. `age_days` is never null, so the null
/// tests become conditions that always or never hold. Operators this crate
/// does not know are passed through unchanged with the value turned into a
/// date.
pub fn rewrite_condition(condition: &FilterExpr, today: NaiveDate) -> Result<FilterExpr, Error> {
    if let Some((_, op, value)) = condition.as_comparison() {
        return rewrite_search(op, days(value)?, today);
    }
    match condition {
        FilterExpr::In { values, .. } => Ok(FilterExpr::In {
            field: RELEASE_DATE.to_string(),
            values: whole_day_dates(values, today)?,
        }),
        FilterExpr::NotIn { values, .. } => Ok(FilterExpr::NotIn {
            field: RELEASE_DATE.to_string(),
            values: whole_day_dates(values, today)?,
        }),
        FilterExpr::IsNull { .. } => Ok(never()),
        FilterExpr::IsNotNull { .. } => Ok(FilterExpr::or(vec![
            SimpleFilter::IsNull {
                field: RELEASE_DATE.to_string(),
            },
            SimpleFilter::IsNotNull {
                field: RELEASE_DATE.to_string(),
            },
        ])),
        FilterExpr::Other { op, value, .. } => Ok(FilterExpr::Other {
            field: RELEASE_DATE.to_string(),
            op: op.clone(),
            value: Value::Date(date_for_age(days(value)?, today)?),
        }),
        _ => Err(Error::UnsupportedSearch {
            field: AGE_DAYS.to_string(),
            reason: format!("expected a single condition, got {condition}"),
        }),
    }
}

fn days(value: &Value) -> Result<f64, Error> {
    value.as_f64().ok_or_else(|| Error::UnsupportedSearch {
        field: AGE_DAYS.to_string(),
        reason: format!("expected a number of days, got {value}"),
    })
}

fn whole_day_dates(values: &[Value], today: NaiveDate) -> Result<Vec<Value>, Error> {
    let mut dates = Vec::with_capacity(values.len());
    for value in values {
        let age = days(value)?;
        if age.fract() == 0.0 {
            dates.push(Value::Date(days_before(age, today)?));
        }
    }
    Ok(dates)
}

/// Holds for no record.
fn never() -> FilterExpr {
    FilterExpr::and(vec![
        SimpleFilter::IsNull {
            field: RELEASE_DATE.to_string(),
        },
        SimpleFilter::IsNotNull {
            field: RELEASE_DATE.to_string(),
        },
    ])
}

/// Holds for every record with a release date.
fn dated() -> FilterExpr {
    FilterExpr::IsNotNull {
        field: RELEASE_DATE.to_string(),
    }
}

/// The `age_days` hooks as registered for `library.book`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeDaysField;

impl ComputedHooks for AgeDaysField {
    fn field(&self) -> &'static str {
        AGE_DAYS
    }

    fn depends(&self) -> &'static [&'static str] {
        &[RELEASE_DATE]
    }

    fn compute(&self, books: &mut [Book], today: NaiveDate) {
        compute(books, today);
    }

    fn inverse(&self, books: &mut [Book], today: NaiveDate) -> Result<usize, Error> {
        apply_inverse(books, today)
    }

    fn search(&self, condition: &FilterExpr, today: NaiveDate) -> Result<FilterExpr, Error> {
        rewrite_condition(condition, today)
    }
}
