//! JSON Export functionality
//!
//! Exports the complete data set to JSON format with schema versioning.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetMillError, BudgetMillResult};
use crate::models::{Budget, Category, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub categories: Vec<Category>,

    /// Transactions in insertion order
    pub transactions: Vec<Transaction>,

    pub budgets: Vec<Budget>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub category_count: usize,
    pub transaction_count: usize,
    pub budget_count: usize,

    /// Date of the earliest transaction
    pub earliest_transaction: Option<String>,

    /// Date of the latest transaction
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Snapshot everything held by `storage`
    pub fn from_storage(storage: &Storage) -> Self {
        let categories: Vec<Category> = storage.categories.iter().cloned().collect();
        let transactions: Vec<Transaction> = storage.transactions.iter().cloned().collect();
        let budgets: Vec<Budget> = storage.budgets.iter().cloned().collect();

        let earliest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .map(|d| d.date().to_string());
        let latest_transaction = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .map(|d| d.date().to_string());

        let metadata = ExportMetadata {
            category_count: categories.len(),
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            earliest_transaction,
            latest_transaction,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            categories,
            transactions,
            budgets,
            metadata,
        }
    }

    /// Check the schema version and that every reference resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();

        for txn in &self.transactions {
            if !category_ids.contains(&txn.category_id) {
                return Err(format!(
                    "Transaction {} references unknown category {}",
                    txn.id, txn.category_id
                ));
            }
        }

        for budget in &self.budgets {
            if !category_ids.contains(&budget.category_id) {
                return Err(format!(
                    "Budget {} references unknown category {}",
                    budget.id, budget.category_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full data set to JSON; refuses a snapshot with dangling references
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> BudgetMillResult<()> {
    let export = FullExport::from_storage(storage);
    export.validate().map_err(BudgetMillError::Export)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetMillError::Export(e.to_string()))?;

    Ok(())
}
