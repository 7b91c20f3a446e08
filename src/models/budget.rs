//! Budget model
//!
//! A budget caps spending in one expense category over a window of time.
//! The spent amount is never stored: `BudgetStatus::compute` projects it from
//! the transactions on every read.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;
use super::period::DateRange;
use super::transaction::Transaction;

/// Default percentage of the cap above which a budget is "approaching" its limit
pub const DEFAULT_WARNING_PERCENT: u8 = 80;

/// Budget period length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// The calendar window of this length containing `reference`
    pub fn window(&self, reference: NaiveDate, week_start: Weekday) -> DateRange {
        match self {
            Self::Weekly => DateRange::week_containing(reference, week_start),
            Self::Monthly => DateRange::month_containing(reference),
            Self::Yearly => DateRange::year_containing(reference),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annual" => Some(Self::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A spending cap for a category over `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// The expense category this budget caps
    pub category_id: CategoryId,

    /// Maximum planned spend
    pub cap: Money,

    /// Nominal period length
    pub period: BudgetPeriod,

    /// Window start (inclusive)
    pub start: NaiveDateTime,

    /// Window end (exclusive)
    pub end: NaiveDateTime,

    /// When the budget was created
    pub created_at: DateTime<Utc>,

    /// When the budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a budget over an explicit window
    pub fn new(
        category_id: CategoryId,
        cap: Money,
        period: BudgetPeriod,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            category_id,
            cap,
            period,
            start,
            end,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a budget over the calendar window containing `reference`
    pub fn for_window(
        category_id: CategoryId,
        cap: Money,
        period: BudgetPeriod,
        reference: NaiveDate,
        week_start: Weekday,
    ) -> Self {
        let range = period.window(reference, week_start);
        Self::new(
            category_id,
            cap,
            period,
            range.start_datetime(),
            range.end_datetime(),
        )
    }

    /// Whether a timestamp falls inside the window
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    /// Set the cap
    pub fn set_cap(&mut self, cap: Money) {
        self.cap = cap;
        self.updated_at = Utc::now();
    }

    /// The budget for the window immediately following this one, same cap
    ///
    /// Calendar-aligned windows roll to the next calendar window; any other
    /// window is shifted forward by its own length.
    pub fn next_period(&self, week_start: Weekday) -> Self {
        let aligned = self.period.window(self.start.date(), week_start);
        let (start, end) = if aligned.start_datetime() == self.start
            && aligned.end_datetime() == self.end
        {
            let next = self.period.window(self.end.date(), week_start);
            (next.start_datetime(), next.end_datetime())
        } else {
            let length: Duration = self.end - self.start;
            (self.end, self.end + length)
        };
        Self::new(self.category_id, self.cap, self.period, start, end)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.cap.is_negative() {
            return Err(BudgetValidationError::NegativeCap);
        }

        if !self.cap.is_within_limit() {
            return Err(BudgetValidationError::CapTooLarge(self.cap));
        }

        if self.end <= self.start {
            return Err(BudgetValidationError::EmptyWindow {
                start: self.start,
                end: self.end,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} cap ({} .. {})",
            self.cap,
            self.period,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// How close a budget is to its cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    Normal,
    ApproachingLimit,
    OverBudget,
}

impl fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "OK"),
            Self::ApproachingLimit => write!(f, "Approaching limit"),
            Self::OverBudget => write!(f, "Over budget"),
        }
    }
}

/// Spend-vs-cap projection of a budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub cap: Money,
    pub spent: Money,
    /// `max(cap - spent, 0)`
    pub remaining: Money,
    /// `min(spent / cap, 1.0)`, zero when the cap is zero
    pub progress: f64,
    pub is_over_budget: bool,
    pub health: BudgetHealth,
}

impl BudgetStatus {
    /// Compute the status with the default warning threshold
    pub fn compute<'a, I>(budget: &Budget, transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::compute_with_threshold(budget, transactions, DEFAULT_WARNING_PERCENT)
    }

    /// Compute the status; `warning_percent` is the share of the cap above
    /// which the budget counts as approaching its limit
    pub fn compute_with_threshold<'a, I>(
        budget: &Budget,
        transactions: I,
        warning_percent: u8,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let spent: Money = transactions
            .into_iter()
            .filter(|t| {
                t.is_expense() && t.category_id == budget.category_id && budget.contains(t.date)
            })
            .map(|t| t.amount)
            .sum();

        let cap = budget.cap;
        let is_over_budget = spent > cap;
        let progress = if cap.is_positive() {
            spent.ratio(cap).min(1.0)
        } else {
            0.0
        };

        let health = if is_over_budget {
            BudgetHealth::OverBudget
        } else if i128::from(spent.cents()) * 100
            > i128::from(cap.cents()) * i128::from(warning_percent)
        {
            BudgetHealth::ApproachingLimit
        } else {
            BudgetHealth::Normal
        };

        Self {
            budget_id: budget.id,
            category_id: budget.category_id,
            cap,
            spent,
            remaining: (cap - spent).floor_zero(),
            progress,
            is_over_budget,
            health,
        }
    }
}

/// Totals across a set of budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BudgetTotals {
    pub total_cap: Money,
    pub total_spent: Money,
    /// `total_cap - total_spent`; negative when overspent overall
    pub total_remaining: Money,
}

impl BudgetTotals {
    pub fn across<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a BudgetStatus>,
    {
        let (total_cap, total_spent) = statuses
            .into_iter()
            .fold((Money::zero(), Money::zero()), |(cap, spent), s| {
                (cap + s.cap, spent + s.spent)
            });
        Self {
            total_cap,
            total_spent,
            total_remaining: total_cap - total_spent,
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeCap,
    CapTooLarge(Money),
    EmptyWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCap => write!(f, "Budget cap cannot be negative"),
            Self::CapTooLarge(cap) => {
                write!(f, "Budget cap {} exceeds the maximum of {}", cap, Money::MAX_AMOUNT)
            }
            Self::EmptyWindow { start, end } => {
                write!(f, "Budget end {} must be after start {}", end, start)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
