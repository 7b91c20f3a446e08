//! Period summary behind the statistics cards

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{DateRange, Money, Period, Transaction};

/// Income, expense and net over one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// `None` for the unbounded "all" period
    pub range: Option<DateRange>,
    pub income: Money,
    pub expense: Money,
    /// `income - expense`, may be negative
    pub net: Money,
    pub count: usize,
    /// Days of the window elapsed up to the reference date (at least one)
    pub elapsed_days: i64,
    /// Expense spread over the elapsed days
    pub average_daily_expense: Money,
}

impl PeriodSummary {
    /// Summarize the transactions falling in `period` around `reference`
    pub fn generate<'a, I>(
        transactions: I,
        period: Period,
        reference: NaiveDate,
        week_start: Weekday,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let range = period.range(reference, week_start);

        let mut income = Money::zero();
        let mut expense = Money::zero();
        let mut count = 0;
        let mut earliest: Option<NaiveDate> = None;

        for txn in transactions {
            let day = txn.day();
            if range.is_some_and(|r| !r.contains(day)) {
                continue;
            }
            if txn.is_income() {
                income += txn.amount;
            } else {
                expense += txn.amount;
            }
            count += 1;
            earliest = Some(earliest.map_or(day, |e| e.min(day)));
        }

        let elapsed_days = match range {
            Some(r) => ((reference - r.start).num_days() + 1).clamp(1, r.num_days()),
            None => earliest.map_or(1, |e| ((reference - e).num_days() + 1).max(1)),
        };

        Self {
            period,
            range,
            income,
            expense,
            net: income - expense,
            count,
            elapsed_days,
            average_daily_expense: expense.average_over(elapsed_days),
        }
    }
}
