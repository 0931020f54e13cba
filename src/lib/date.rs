//! Day-precise due dates
//!
//! Dates are entered and displayed as `DD/MM/YYYY`. Validation takes care of
//! short months and leap years so that a `Date` always refers to a day that
//! exists, and the ordering is the chronological one.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

/// A date with day-precision
///
/// Supports years in the range 1000..=9999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    year: u16,
    month: Month,
    day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.day, self.month.number(), self.year)
    }
}

/// Twelve months in the year, identified by their 3-letter abbreviations
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, PartialOrd, Ord)]
pub enum Month {
    Jan = 0,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Month from its calendar number (`1` is `Jan`)
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(Self::from_usize)
    }

    /// Calendar number of the month (`Jan` is `1`)
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Number of days in this month of the given year
    pub fn count(self, year: u16) -> u8 {
        use Month::*;
        match self {
            Jan | Mar | May | Jul | Aug | Oct | Dec => 31,
            Apr | Jun | Sep | Nov => 30,
            Feb => if is_leap(year) { 29 } else { 28 },
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Ways in which a date taken from user input can be wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateError {
    /// not of the shape DD/MM/YYYY
    Malformed(String),
    /// year is outside of 1000..=9999
    UnsupportedYear(usize),
    /// month outside of 1..=12
    InvalidMonth(usize),
    /// Feb 29 of a non-leap year
    NotBissextile(usize),
    /// Feb 30 or Feb 31 or 31st day of a 30-day month
    MonthTooShort(Month, usize),
    /// day outside of 1..=31
    InvalidDay(usize),
}

impl Date {
    /// Validate year-month-day into date
    pub fn from(year: usize, month: Month, day: usize) -> Result<Self, DateError> {
        if !(1000..=9999).contains(&year) {
            Err(DateError::UnsupportedYear(year))
        } else if day == 0 || day > 31 {
            Err(DateError::InvalidDay(day))
        } else if day <= month.count(year as u16) as usize {
            Ok(Self { year: year as u16, month, day: day as u8 })
        } else if day >= 30 {
            Err(DateError::MonthTooShort(month, day))
        } else {
            Err(DateError::NotBissextile(year))
        }
    }

    /// Current date according to the local clock
    pub fn today() -> Self {
        use chrono::Datelike;
        let now = chrono::Local::now().date_naive();
        let month = Month::from_number(now.month() as usize).unwrap_or(Month::Jan);
        // the local clock is trusted to be within the supported range
        let year = (now.year().max(1000) as usize).min(9999);
        Self::from(year, month, now.day() as usize)
            .unwrap_or(Self { year: year as u16, month, day: 1 })
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parse `DD/MM/YYYY`, with 1- or 2-digit day and month
    fn from_str(s: &str) -> Result<Self, DateError> {
        let malformed = || DateError::Malformed(s.trim().to_string());
        let fields = s.trim().split('/').collect::<Vec<_>>();
        let (day, month, year) = match fields.as_slice() {
            [d, m, y] => (*d, *m, *y),
            _ => return Err(malformed()),
        };
        let digits = |field: &str, len: std::ops::RangeInclusive<usize>| {
            len.contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(day, 1..=2) || !digits(month, 1..=2) || !digits(year, 4..=4) {
            return Err(malformed());
        }
        // digits only, parsing can't fail
        let day = day.parse::<usize>().map_err(|_| malformed())?;
        let month = month.parse::<usize>().map_err(|_| malformed())?;
        let year = year.parse::<usize>().map_err(|_| malformed())?;
        let month = Month::from_number(month).ok_or(DateError::InvalidMonth(month))?;
        Date::from(year, month, day)
    }
}

fn is_leap(year: u16) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DateError::*;
        match self {
            Malformed(s) => write!(f, "'{}' is not a date of the form DD/MM/YYYY", s),
            UnsupportedYear(y) => write!(f, "{} is outside of the supported range for years", y),
            InvalidMonth(m) => write!(f, "{} is not a valid month", m),
            NotBissextile(y) => write!(f, "{} is not bissextile, Feb 29 does not exist", y),
            MonthTooShort(m, d) => write!(
                f,
                "{} is a short month, it does not have a {}th day",
                m, d,
            ),
            InvalidDay(d) => write!(f, "{} is not a valid day", d),
        }
    }
}

impl std::error::Error for DateError {}

impl DateError {
    /// What message to show to help fix the date error
    pub fn fix_hint(&self) -> String {
        use DateError::*;
        match self {
            Malformed(_) => "dates are written DD/MM/YYYY, e.g. 09/03/2026".to_string(),
            UnsupportedYear(_) => "year should be between 1000 and 9999 inclusive".to_string(),
            InvalidMonth(m) => format!("{} is not in the range 1 ..= 12", m),
            NotBissextile(y) => format!("did you mean 28/02/{y} or 01/03/{y} ?", y = y),
            MonthTooShort(m, d) => format!("{} is only {} days long", m,
                if *m == Month::Feb { 28.max(d - 1) } else { 30 }
            ),
            InvalidDay(d) => format!("{} is not in the range 1 ..= 31", d),
        }
    }
}
