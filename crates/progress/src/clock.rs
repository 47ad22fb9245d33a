//! Where "today" comes from.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current date and time.
pub trait Clock {
    /// Today's date in the user's time zone.
    fn today(&self) -> NaiveDate;

    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck on one day, for tests and scripted sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    /// Always report `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now(&self) -> DateTime<Utc> {
        self.date.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}
