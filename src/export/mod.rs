//! Export module for BudgetMill
//!
//! Provides data export in two formats:
//! - CSV: transactions and per-category totals (spreadsheet-compatible)
//! - JSON: machine-readable full export

pub mod csv;
pub mod json;

pub use self::csv::{export_category_totals_csv, export_transactions_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
