//! Publication date value type.
//!
//! # Responsibility
//! - Parse dates from the composite `date` field or from year/month/day parts.
//! - Produce the normalized `YYYY`, `YYYY-MM` or `YYYY-MM-DD` text.
//!
//! # Invariants
//! - A `Date` always carries a year; a day is only kept alongside a month.
//! - Full dates are valid calendar days.

use crate::model::month::Month;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").expect("valid year regex"));
static ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})(?:[-/](\d{1,2}))?$").expect("valid iso date regex")
});
static MONTH_YEAR_NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").expect("valid month/year regex"));
static DOTTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid dotted date regex")
});
static NAMED_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(?:(\d{1,2}),\s*)?(\d{4})$").expect("valid named date regex")
});

/// Parsed publication date with year, optional month and optional day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    year: i32,
    month: Option<Month>,
    day: Option<u32>,
}

impl Date {
    /// Year-only date.
    pub fn year_only(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Year and month.
    pub fn year_month(year: i32, month: Month) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    /// Full calendar date. Returns `None` for days that do not exist.
    pub fn full(year: i32, month: Month, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.number(), day)?;
        Some(Self {
            year,
            month: Some(month),
            day: Some(day),
        })
    }

    /// Parses the text of a composite date field.
    ///
    /// Accepted shapes: `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (also with `/`),
    /// `MM/YYYY`, `DD.MM.YYYY`, `Month YYYY` and `Month DD, YYYY`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = YEAR_RE.captures(trimmed) {
            return Some(Self::year_only(caps[1].parse().ok()?));
        }

        if let Some(caps) = ISO_RE.captures(trimmed) {
            let year = caps[1].parse().ok()?;
            let month = Month::from_number(caps[2].parse().ok()?)?;
            return match caps.get(3) {
                Some(day) => Self::full(year, month, day.as_str().parse().ok()?),
                None => Some(Self::year_month(year, month)),
            };
        }

        if let Some(caps) = MONTH_YEAR_NUMERIC_RE.captures(trimmed) {
            let month = Month::from_number(caps[1].parse().ok()?)?;
            return Some(Self::year_month(caps[2].parse().ok()?, month));
        }

        if let Some(caps) = DOTTED_RE.captures(trimmed) {
            let month = Month::from_number(caps[2].parse().ok()?)?;
            return Self::full(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
        }

        if let Some(caps) = NAMED_MONTH_RE.captures(trimmed) {
            let month = Month::parse(&caps[1])?;
            let year = caps[3].parse().ok()?;
            return match caps.get(2) {
                Some(day) => Self::full(year, month, day.as_str().parse().ok()?),
                None => Some(Self::year_month(year, month)),
            };
        }

        None
    }

    /// Composes a date from separate year, month and day field values.
    ///
    /// The year must parse as an integer; an unparsable month or day is
    /// dropped rather than failing the whole composition.
    pub fn from_parts(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Option<Self> {
        let year = year.and_then(parse_integer)?;
        let month = month.and_then(Month::parse);
        let day = day.and_then(parse_integer).and_then(|d| u32::try_from(d).ok());

        match (month, day) {
            (Some(month), Some(day)) => {
                Some(Self::full(year, month, day).unwrap_or(Self::year_month(year, month)))
            }
            (Some(month), None) => Some(Self::year_month(year, month)),
            (None, _) => Some(Self::year_only(year)),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// ISO-8601 style text at the precision this date carries.
    pub fn normalized(&self) -> String {
        match (self.month, self.day) {
            (Some(month), Some(day)) => format!("{:04}-{:02}-{:02}", self.year, month.number(), day),
            (Some(month), None) => format!("{:04}-{:02}", self.year, month.number()),
            _ => format!("{:04}", self.year),
        }
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.normalized())
    }
}

fn parse_integer(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}
