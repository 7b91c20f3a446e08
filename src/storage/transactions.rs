//! Transaction repository
//!
//! Keeps transactions in insertion order with an id index, and snapshots them
//! to transactions.json.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::BudgetMillError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::unique_match;

/// On-disk layout of transactions.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TransactionData {
    pub transactions: Vec<Transaction>,
}

/// Ordered, indexed transaction collection
#[derive(Debug, Default)]
pub struct TransactionRepository {
    path: Option<PathBuf>,
    transactions: Vec<Transaction>,
    /// id -> position in `transactions`
    index: HashMap<TransactionId, usize>,
}

impl TransactionRepository {
    /// Repository backed by a snapshot file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    /// Repository that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the snapshot, replacing current contents
    pub fn load(&mut self) -> Result<(), BudgetMillError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data: TransactionData = read_json(path)?;
        self.transactions = data.transactions;
        self.rebuild_index();
        debug!(count = self.transactions.len(), "loaded transactions");
        Ok(())
    }

    /// Write the snapshot in insertion order
    pub fn save(&self) -> Result<(), BudgetMillError> {
        match &self.path {
            Some(path) => write_json_atomic(
                path,
                &TransactionData {
                    transactions: self.transactions.clone(),
                },
            ),
            None => Ok(()),
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .transactions
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.index.get(&id).map(|&i| &self.transactions[i])
    }

    /// Look up by full UUID, prefixed UUID or the short display form
    pub fn find(&self, identifier: &str) -> Result<Option<&Transaction>, BudgetMillError> {
        if let Ok(id) = identifier.trim().parse::<TransactionId>() {
            return Ok(self.get(id));
        }
        unique_match(
            self.transactions.iter().filter(|t| t.id.matches(identifier)),
            "Transaction",
            identifier,
        )
    }

    /// All transactions in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Whether any transaction is filed under `category_id`
    pub fn references_category(&self, category_id: CategoryId) -> bool {
        self.transactions
            .iter()
            .any(|t| t.category_id == category_id)
    }

    /// Append a transaction
    pub fn insert(&mut self, txn: Transaction) -> Result<(), BudgetMillError> {
        if self.index.contains_key(&txn.id) {
            return Err(BudgetMillError::Duplicate {
                entity_type: "Transaction",
                identifier: txn.id.to_string(),
            });
        }
        self.index.insert(txn.id, self.transactions.len());
        self.transactions.push(txn);
        Ok(())
    }

    /// Replace a stored transaction in place, returning the previous version
    pub fn replace(&mut self, txn: Transaction) -> Result<Transaction, BudgetMillError> {
        let position = *self
            .index
            .get(&txn.id)
            .ok_or_else(|| BudgetMillError::transaction_not_found(txn.id.to_string()))?;
        Ok(std::mem::replace(&mut self.transactions[position], txn))
    }

    /// Remove a transaction, keeping the order of the rest
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let position = self.index.remove(&id)?;
        let removed = self.transactions.remove(position);
        self.rebuild_index();
        Some(removed)
    }
}
