//! Core data models for BudgetMill
//!
//! This module contains the data structures of the finance domain: money,
//! categories, transactions, budgets and calendar periods.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{
    Budget, BudgetHealth, BudgetPeriod, BudgetStatus, BudgetTotals, DEFAULT_WARNING_PERCENT,
};
pub use category::{default_categories, Category, PresetCategory};
pub use ids::{BudgetId, CategoryId, TransactionId};
pub use money::Money;
pub use period::{DateRange, Period};
pub use transaction::{RecurringInterval, Transaction, TransactionType};
