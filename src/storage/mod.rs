//! Storage layer for BudgetMill
//!
//! In-memory repositories with optional JSON snapshots written atomically,
//! plus the audit trail of every change.

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetMillPaths;
use crate::error::BudgetMillError;

/// The single item a short ID matched; `None` when nothing did
pub(crate) fn unique_match<'a, T: 'a>(
    mut matches: impl Iterator<Item = &'a T>,
    entity_type: &'static str,
    identifier: &str,
) -> Result<Option<&'a T>, BudgetMillError> {
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    match matches.count() {
        0 => Ok(Some(first)),
        more => Err(BudgetMillError::Ambiguous {
            entity_type,
            identifier: identifier.trim().to_string(),
            count: more + 1,
        }),
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: Option<BudgetMillPaths>,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open a data directory, seeding it on first use, and load every snapshot
    pub fn open(paths: BudgetMillPaths) -> Result<Self, BudgetMillError> {
        initialize_storage(&paths)?;

        let mut storage = Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths: Some(paths),
        };
        storage.load_all()?;
        Ok(storage)
    }

    /// Storage that never touches the filesystem, holding the preset catalog
    pub fn in_memory() -> Self {
        Self {
            paths: None,
            transactions: TransactionRepository::in_memory(),
            categories: CategoryRepository::with_defaults(),
            budgets: BudgetRepository::in_memory(),
            audit: None,
        }
    }

    /// Get the paths configuration, if file-backed
    pub fn paths(&self) -> Option<&BudgetMillPaths> {
        self.paths.as_ref()
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BudgetMillError> {
        self.categories.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BudgetMillError> {
        self.categories.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// The audit log, if file-backed
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    fn write_audit(&self, entry: AuditEntry) -> Result<(), BudgetMillError> {
        debug!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "audit"
        );
        match &self.audit {
            Some(logger) => logger.log(&entry),
            None => Ok(()),
        }
    }

    /// Record a create operation
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetMillError> {
        self.write_audit(AuditEntry::create(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }

    /// Record an update operation
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), BudgetMillError> {
        self.write_audit(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a delete operation
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetMillError> {
        self.write_audit(AuditEntry::delete(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use tempfile::TempDir;

    #[test]
    fn test_open_seeds_and_loads() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.categories.count(), 13);
        assert_eq!(storage.transactions.count(), 0);
        assert_eq!(storage.budgets.count(), 0);
    }

    #[test]
    fn test_in_memory() {
        let storage = Storage::in_memory();
        assert!(storage.paths().is_none());
        assert!(storage.audit().is_none());
        assert_eq!(storage.categories.count(), 13);
        storage.save_all().unwrap();
    }

    #[test]
    fn test_audit_entries_written() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetMillPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        let dining = storage.categories.find_by_name("Dining", None).unwrap();
        storage
            .log_delete(
                EntityType::Category,
                dining.id.to_string(),
                Some(dining.name.clone()),
                dining,
            )
            .unwrap();

        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Delete);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Dining"));
    }
}
