//! Calendar windows and named reporting periods
//!
//! A `DateRange` is a half-open `[start, end)` span of calendar dates. Periods
//! such as "this week" resolve to the calendar window containing a reference
//! date, never to a rolling N-day window.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of calendar dates: `start` is included, `end` is not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting empty or inverted spans
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodParseError> {
        if end <= start {
            return Err(PeriodParseError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive constructor for user-facing "from..to" input
    pub fn inclusive(first: NaiveDate, last: NaiveDate) -> Result<Self, PeriodParseError> {
        Self::new(first, last + Duration::days(1))
    }

    /// The single day containing `date`
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date + Duration::days(1),
        }
    }

    /// The calendar week containing `date`, starting on `week_start`
    pub fn week_containing(date: NaiveDate, week_start: Weekday) -> Self {
        let start = start_of_week(date, week_start);
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    /// The calendar month containing `date`
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = start_of_month(date);
        Self {
            start,
            end: start
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// The calendar year containing `date`
    pub fn year_containing(date: NaiveDate) -> Self {
        let start = start_of_year(date);
        Self {
            start,
            end: start
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Whether a timestamp falls on one of the dates in the range
    pub fn contains_datetime(&self, at: NaiveDateTime) -> bool {
        self.contains(at.date())
    }

    /// Number of days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Start of the range as local midnight
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// End of the range as local midnight (exclusive)
    pub fn end_datetime(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }

    /// Last date included in the range
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    /// Every date in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.last_day().format("%Y-%m-%d")
        )
    }
}

/// First day of the calendar week containing `date`
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    date - Duration::days(i64::from(offset))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

/// A named period relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    ThisYear,
    All,
}

impl Period {
    /// All periods in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Today,
            Self::ThisWeek,
            Self::ThisMonth,
            Self::ThisYear,
            Self::All,
        ]
    }

    /// Resolve to a calendar window; `None` means unbounded
    pub fn range(&self, reference: NaiveDate, week_start: Weekday) -> Option<DateRange> {
        match self {
            Self::Today => Some(DateRange::day(reference)),
            Self::ThisWeek => Some(DateRange::week_containing(reference, week_start)),
            Self::ThisMonth => Some(DateRange::month_containing(reference)),
            Self::ThisYear => Some(DateRange::year_containing(reference)),
            Self::All => None,
        }
    }

    /// Check whether `date` falls in this period as seen from `reference`
    pub fn contains(&self, date: NaiveDate, reference: NaiveDate, week_start: Weekday) -> bool {
        self.range(reference, week_start)
            .map_or(true, |range| range.contains(date))
    }

    /// Parse a period name ("today", "week", "this-month", "all", ...)
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "today" | "day" => Ok(Self::Today),
            "thisweek" | "week" => Ok(Self::ThisWeek),
            "thismonth" | "month" => Ok(Self::ThisMonth),
            "thisyear" | "year" => Ok(Self::ThisYear),
            "all" => Ok(Self::All),
            _ => Err(PeriodParseError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::ThisWeek => write!(f, "This week"),
            Self::ThisMonth => write!(f, "This month"),
            Self::ThisYear => write!(f, "This year"),
            Self::All => write!(f, "All"),
        }
    }
}

/// Parse a weekday name ("monday", "sun", ...)
pub fn parse_weekday(s: &str) -> Result<Weekday, PeriodParseError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| PeriodParseError::InvalidWeekday(s.to_string()))
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidWeekday(String),
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid period: {}", s),
            Self::InvalidWeekday(s) => write!(f, "Invalid weekday: {}", s),
            Self::EmptyRange { start, end } => {
                write!(f, "Range end {} must be after start {}", end, start)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}
