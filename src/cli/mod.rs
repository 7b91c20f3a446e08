//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod export;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};

use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{Money, Period, TransactionType};

/// clap value parser for "expense" / "income"
pub(crate) fn parse_kind(s: &str) -> Result<TransactionType, String> {
    TransactionType::parse(s).ok_or_else(|| format!("expected expense or income, got '{}'", s))
}

/// clap value parser for period names
pub(crate) fn parse_period(s: &str) -> Result<Period, String> {
    Period::parse(s).map_err(|e| e.to_string())
}

/// Parse a user-entered amount
pub(crate) fn parse_money(s: &str) -> BudgetMillResult<Money> {
    Money::parse(s).map_err(|e| BudgetMillError::Validation(e.to_string()))
}

/// Parse an optional YYYY-MM-DD reference date, defaulting to today
pub(crate) fn reference_date(on: Option<&str>) -> BudgetMillResult<NaiveDate> {
    match on {
        None => Ok(Local::now().date_naive()),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
            BudgetMillError::Validation(format!("Invalid date '{}': use YYYY-MM-DD", text))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsers() {
        assert_eq!(parse_kind("Income"), Ok(TransactionType::Income));
        assert!(parse_kind("transfer").is_err());
        assert_eq!(parse_period("month"), Ok(Period::ThisMonth));
        assert_eq!(parse_money("12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_money("abc").unwrap_err().is_validation());
    }

    #[test]
    fn test_reference_date() {
        assert_eq!(
            reference_date(Some("2024-12-19")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 19).unwrap()
        );
        assert!(reference_date(Some("19/12/2024")).unwrap_err().is_validation());
        assert!(reference_date(None).is_ok());
    }
}
