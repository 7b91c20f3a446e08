//! Display formatting for terminal output
//!
//! Renders models and reports as tables and text blocks.

pub mod budget;
pub mod category;
pub mod report;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_statuses, format_budget_totals};
pub use category::format_category_list;
pub use report::{format_category_breakdown, format_period_summary, format_series};
pub use transaction::{format_transaction_details, format_transaction_register};
