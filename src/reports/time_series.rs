//! Time series for the bar and line charts
//!
//! Transactions are summed into calendar buckets (day, week or month). Sparse
//! series only contain buckets with activity; dense series contain every
//! bucket in the span, zero-filled.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::period::{start_of_month, start_of_week};
use crate::models::{DateRange, Money, Transaction};

/// Bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    /// Calendar weeks starting on the given weekday
    Week(Weekday),
    Month,
}

impl Granularity {
    /// First date of the bucket containing `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week(week_start) => start_of_week(date, *week_start),
            Self::Month => start_of_month(date),
        }
    }

    /// First date of the bucket after the one starting at `bucket`
    pub fn next_bucket(&self, bucket: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => bucket + Duration::days(1),
            Self::Week(_) => bucket + Duration::days(7),
            Self::Month => bucket
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Parse "day", "week" or "month"; weeks start on `week_start`
    pub fn parse(s: &str, week_start: Weekday) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week(week_start)),
            "month" | "monthly" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Whether empty buckets are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesMode {
    #[default]
    Sparse,
    Dense,
}

/// One bucket of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// First date of the bucket
    pub bucket: NaiveDate,
    pub total: Money,
    pub count: usize,
}

/// Sum transaction amounts into ascending buckets
///
/// With `range`, only transactions inside it are counted and a dense series
/// spans exactly the buckets touching it. Without it, a dense series spans the
/// first through last bucket that has a transaction.
pub fn time_series<'a, I>(
    transactions: I,
    granularity: Granularity,
    mode: SeriesMode,
    range: Option<DateRange>,
) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();
    for txn in transactions {
        let day = txn.day();
        if range.is_some_and(|r| !r.contains(day)) {
            continue;
        }
        let entry = buckets.entry(granularity.bucket_start(day)).or_default();
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    let to_point = |(bucket, (total, count)): (NaiveDate, (Money, usize))| SeriesPoint {
        bucket,
        total,
        count,
    };

    if mode == SeriesMode::Sparse {
        return buckets.into_iter().map(to_point).collect();
    }

    let span = match range {
        Some(r) => Some((
            granularity.bucket_start(r.start),
            granularity.bucket_start(r.last_day()),
        )),
        None => buckets
            .keys()
            .next()
            .copied()
            .zip(buckets.keys().next_back().copied()),
    };
    let Some((first, last)) = span else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut bucket = first;
    while bucket <= last {
        let (total, count) = buckets.get(&bucket).copied().unwrap_or_default();
        points.push(SeriesPoint {
            bucket,
            total,
            count,
        });
        let next = granularity.next_bucket(bucket);
        if next <= bucket {
            break;
        }
        bucket = next;
    }
    points
}

/// Dense daily series over the `days` days ending on `reference`
///
/// Empty when `days` is zero or the window falls outside the calendar.
pub fn daily_trend<'a, I>(transactions: I, reference: NaiveDate, days: u32) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if days == 0 {
        return Vec::new();
    }
    let start = reference.checked_sub_signed(Duration::days(i64::from(days) - 1));
    let end = reference.checked_add_signed(Duration::days(1));
    match (start, end) {
        (Some(start), Some(end)) => time_series(
            transactions,
            Granularity::Day,
            SeriesMode::Dense,
            Some(DateRange { start, end }),
        ),
        _ => Vec::new(),
    }
}
