//! Local calendar dates, ranges and month grids
//!
//! Dates are plain calendar days in the user's local timezone. They cross
//! every boundary as `YYYY-MM-DD` with no time-of-day or offset.

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::state::StateError;

/// Wire format of a calendar date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of cells in a calendar month grid (6 full weeks)
pub const GRID_DAYS: usize = 42;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, StateError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| StateError::InvalidInput(format!("Invalid date '{}': {}", s, e)))
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The date on the user's device right now
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Every calendar date in `[start, end]`, ascending; empty when `start > end`
pub fn enumerate_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse both ends from `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, StateError> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }

    /// The `days` days ending on (and including) `end`
    pub fn last_days(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_days(chrono::Days::new(days.saturating_sub(1) as u64))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, end)
    }

    /// January 1st through December 31st of a year
    pub fn year(year: i32) -> Result<Self, StateError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        let end = NaiveDate::from_ymd_opt(year, 12, 31);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self::new(start, end)),
            _ => Err(StateError::InvalidInput(format!("Year out of range: {}", year))),
        }
    }

    /// Every date in the range
    pub fn dates(&self) -> Vec<NaiveDate> {
        enumerate_dates(self.start, self.end)
    }

    /// Number of days in the range (0 when start > end)
    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", format_date(self.start), format_date(self.end))
    }
}

/// Range choices offered by the per-habit statistics view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    /// Last 7 days including today
    Week,
    /// Last 30 days including today
    Month,
    /// A calendar year
    Year(i32),
    /// Explicit start and end
    Custom(DateRange),
}

impl RangePreset {
    /// Resolve the preset relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, StateError> {
        match self {
            Self::Week => Ok(DateRange::last_days(today, 7)),
            Self::Month => Ok(DateRange::last_days(today, 30)),
            Self::Year(year) => DateRange::year(*year),
            Self::Custom(range) => Ok(*range),
        }
    }
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Month number is 1-based; None when out of range
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> Result<Self, StateError> {
        let invalid = || StateError::InvalidInput(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The 1st of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::containing)
            .unwrap_or(*self)
    }

    /// Whether a date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Monday on or before the 1st of the month
    pub fn grid_start(&self) -> NaiveDate {
        let first = self.first_day();
        let offset = first.weekday().num_days_from_monday() as u64;
        first.checked_sub_days(chrono::Days::new(offset)).unwrap_or(first)
    }

    /// The 42 days of the month grid, Monday-first
    pub fn grid_days(&self) -> Vec<NaiveDate> {
        self.grid_start().iter_days().take(GRID_DAYS).collect()
    }

    /// The month grid as a date range
    pub fn grid_range(&self) -> DateRange {
        let start = self.grid_start();
        let end = start
            .checked_add_days(chrono::Days::new(GRID_DAYS as u64 - 1))
            .unwrap_or(start);
        DateRange::new(start, end)
    }

    /// Display label such as "February 2024"
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
