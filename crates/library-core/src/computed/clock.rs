//! Source of "today" for computed fields.

use chrono::{Local, NaiveDate};

/// Supplies the reference day for date-derived fields.
///
/// Callers read it once per operation and pass the date down, so one
/// compute/inverse/search call never straddles midnight.
pub trait Clock: Send + Sync {
    /// The current calendar day.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local time zone. Read on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
